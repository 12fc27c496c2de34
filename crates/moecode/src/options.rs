//! Per-tag option flags.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of independent flags controlling how a tag is scanned and rendered.
///
/// Flags combine with `|`:
///
/// ```rust
/// use moecode::TagOptions;
///
/// let img = TagOptions::ALLOW_TOKEN_BODY_AS_FIRST_ARG
///     | TagOptions::TOKEN_BODY_AS_ARG
///     | TagOptions::POSSIBLE_SINGLE
///     | TagOptions::HTML_SINGLE;
/// assert!(img.contains(TagOptions::HTML_SINGLE));
/// assert!(!img.contains(TagOptions::NO_PARSE_INNER));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagOptions(u8);

impl TagOptions {
    /// No flags set.
    pub const NONE: TagOptions = TagOptions(0);

    /// The tag has no body and no close tag.
    pub const SINGLE: TagOptions = TagOptions(1 << 0);

    /// The tag is single when no close tag follows, or when another open
    /// tag of the same name comes before the nearest close tag.
    pub const POSSIBLE_SINGLE: TagOptions = TagOptions(1 << 1);

    /// The emitted HTML element has no closing element.
    pub const HTML_SINGLE: TagOptions = TagOptions(1 << 2);

    /// The body is copied verbatim up to the literal close tag.
    pub const NO_PARSE_INNER: TagOptions = TagOptions(1 << 3);

    /// The body becomes the `body` argument instead of rendered content.
    pub const TOKEN_BODY_AS_ARG: TagOptions = TagOptions(1 << 4);

    /// Without an explicit `=value`, the body becomes argument 0.
    pub const ALLOW_TOKEN_BODY_AS_FIRST_ARG: TagOptions = TagOptions(1 << 5);

    /// A numeric argument 0 gets a `px` suffix.
    pub const NUMBER_ARG_TO_PX: TagOptions = TagOptions(1 << 6);

    const NAMED: [(&'static str, TagOptions); 7] = [
        ("single", TagOptions::SINGLE),
        ("possible_single", TagOptions::POSSIBLE_SINGLE),
        ("html_single", TagOptions::HTML_SINGLE),
        ("no_parse_inner", TagOptions::NO_PARSE_INNER),
        ("token_body_as_arg", TagOptions::TOKEN_BODY_AS_ARG),
        (
            "allow_token_body_as_first_arg",
            TagOptions::ALLOW_TOKEN_BODY_AS_FIRST_ARG,
        ),
        ("number_arg_to_px", TagOptions::NUMBER_ARG_TO_PX),
    ];

    /// Returns true if every flag in `other` is set.
    pub const fn contains(self, other: TagOptions) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if at least one flag in `other` is set.
    pub const fn intersects(self, other: TagOptions) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Looks up a flag by its snake_case name, as used in YAML tag tables.
    pub fn from_name(name: &str) -> Option<TagOptions> {
        Self::NAMED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, flag)| *flag)
    }

    /// Whether the body resolver has to look ahead for this tag.
    pub(crate) fn wants_body(self) -> bool {
        !self.contains(TagOptions::SINGLE)
            && self.intersects(
                TagOptions::POSSIBLE_SINGLE
                    | TagOptions::TOKEN_BODY_AS_ARG
                    | TagOptions::ALLOW_TOKEN_BODY_AS_FIRST_ARG,
            )
    }
}

impl BitOr for TagOptions {
    type Output = TagOptions;

    fn bitor(self, rhs: TagOptions) -> TagOptions {
        TagOptions(self.0 | rhs.0)
    }
}

impl BitOrAssign for TagOptions {
    fn bitor_assign(&mut self, rhs: TagOptions) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TagOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        write!(f, "TagOptions({})", names.join(" | "))
    }
}
