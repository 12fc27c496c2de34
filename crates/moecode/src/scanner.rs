//! Locating tag tokens in text.
//!
//! The scanner compiles every registered tag name into one alternation, so
//! finding the next token is a single left-to-right regex search no matter
//! how many tags exist:
//!
//! ```text
//! \[(?P<close>/)?(?:(?P<t_b>b)|(?P<t_i>i)|...)(?:=(?P<arg>[^\[\]]*))?\]
//! ```
//!
//! Each name sits in its own capture group, whose identifier is derived from
//! the name. Bracket tokens naming no registered tag never match and stay in
//! the text untouched.

use regex::Regex;

/// A tag token found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagToken<'s, 't> {
    /// Byte offset of the opening `[`.
    pub start: usize,
    /// Byte offset just past the closing `]`.
    pub end: usize,
    /// The registered tag name.
    pub name: &'s str,
    /// Whether the token was `[/name]`.
    pub close: bool,
    /// The raw text after `=`, if any.
    pub arg: Option<&'t str>,
}

/// The combined pattern for all registered tags.
#[derive(Debug, Clone)]
pub(crate) struct Scanner {
    pattern: Option<Regex>,
    groups: Vec<(String, String)>,
}

impl Scanner {
    /// A scanner that never matches.
    pub fn empty() -> Self {
        Self {
            pattern: None,
            groups: Vec::new(),
        }
    }

    /// Compiles the pattern for the given tag names.
    pub fn build<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, regex::Error> {
        let groups: Vec<(String, String)> = names
            .into_iter()
            .map(|name| (group_name(name), name.to_string()))
            .collect();
        if groups.is_empty() {
            return Ok(Self::empty());
        }

        let alternation = groups
            .iter()
            .map(|(group, name)| format!("(?P<{}>{})", group, regex::escape(name)))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r"\[(?P<close>/)?(?:{})(?:=(?P<arg>[^\[\]]*))?\]",
            alternation
        ))?;

        Ok(Self {
            pattern: Some(pattern),
            groups,
        })
    }

    /// Finds the first tag token starting at or after `from`.
    pub fn next_token<'s, 't>(&'s self, text: &'t str, from: usize) -> Option<TagToken<'s, 't>> {
        let pattern = self.pattern.as_ref()?;
        let caps = pattern.captures_at(text, from)?;
        let whole = caps.get(0)?;
        let name = self
            .groups
            .iter()
            .find(|(group, _)| caps.name(group).is_some())
            .map(|(_, name)| name.as_str())?;

        Some(TagToken {
            start: whole.start(),
            end: whole.end(),
            name,
            close: caps.name("close").is_some(),
            arg: caps.name("arg").map(|m| m.as_str()),
        })
    }
}

/// Capture group identifier for a tag name.
///
/// Characters that cannot appear in a group name become `_`, so distinct
/// names such as `a-b` and `a_b` can share an identifier. The registry
/// rejects such collisions.
pub(crate) fn group_name(tag: &str) -> String {
    let mangled: String = tag
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("t_{}", mangled)
}
