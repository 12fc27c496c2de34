//! The tag registry.
//!
//! [`TagRegistry`] owns the tag definitions and everything compiled from
//! them: the combined scanner pattern, each tag's renderer, and the
//! lookahead patterns the body resolver uses. Everything is compiled when a
//! tag is registered, so parsing never has to report configuration problems.
//!
//! # Mutation
//!
//! Registering or unregistering takes `&mut self` and recompiles the scanner.
//! A parse borrows the registry immutably, so the two cannot overlap. A
//! registry is `Send + Sync` and can be shared read-only between threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use regex::Regex;

use crate::definition::TagDefinition;
use crate::error::{ParseError, RegistrationError};
use crate::options::TagOptions;
use crate::render::{Declarative, TagRenderer};
use crate::scanner::{group_name, Scanner};

/// Characters that may not appear in a tag name.
///
/// Brackets, `=` and `/` are token syntax; the rest would be changed by
/// escaping before the scanner ever saw them.
const RESERVED_CHARS: &[char] = &['[', ']', '=', '/', '<', '>', '&', '"', '\''];

/// A definition together with what was compiled from it.
pub(crate) struct RegisteredTag {
    pub definition: TagDefinition,
    pub renderer: Arc<dyn TagRenderer>,
    /// Matches `[name]` and `[name=...]`.
    pub open_pattern: Regex,
    /// Matches `[/name]` and `[/name=...]`.
    pub close_pattern: Regex,
    /// Validates argument 0 and extracts named arguments from it.
    pub arg_pattern: Option<Regex>,
    group: String,
}

impl RegisteredTag {
    fn compile(definition: TagDefinition) -> Result<Self, RegistrationError> {
        let name = definition.name();
        let renderer: Arc<dyn TagRenderer> = match definition.renderer() {
            Some(custom) => Arc::clone(custom),
            None => Arc::new(Declarative::compile(
                name,
                definition.elements(),
                definition.options().contains(TagOptions::HTML_SINGLE),
            )?),
        };
        let escaped = regex::escape(name);
        let open_pattern = Regex::new(&format!(r"\[{}(?:=[^\[\]]*)?\]", escaped))?;
        let close_pattern = Regex::new(&format!(r"\[/{}(?:=[^\[\]]*)?\]", escaped))?;
        let arg_pattern = definition.pattern().map(Regex::new).transpose()?;

        Ok(Self {
            renderer,
            open_pattern,
            close_pattern,
            arg_pattern,
            group: group_name(name),
            definition,
        })
    }

    pub fn options(&self) -> TagOptions {
        self.definition.options()
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }
}

/// A set of tag definitions, ready for parsing.
///
/// # Example
///
/// ```rust
/// use moecode::{Element, TagDefinition, TagRegistry};
///
/// let mut registry = TagRegistry::builtin();
/// registry.unregister("img");
/// registry
///     .register(TagDefinition::new("sup").with_element(Element::new("sup")))
///     .unwrap();
///
/// assert_eq!(registry.parse("x[sup]2[/sup]").unwrap(), "x<sup>2</sup>");
/// assert_eq!(registry.parse("[img]a.png[/img]").unwrap(), "[img]a.png[/img]");
/// ```
pub struct TagRegistry {
    tags: BTreeMap<String, RegisteredTag>,
    scanner: Scanner,
}

impl TagRegistry {
    /// Creates an empty registry. Every tag is passed through as text.
    pub fn new() -> Self {
        Self {
            tags: BTreeMap::new(),
            scanner: Scanner::empty(),
        }
    }

    /// Creates a registry holding the built-in chat tags.
    ///
    /// See [`builtin::definitions`](crate::builtin::definitions).
    pub fn builtin() -> Self {
        Self::from_definitions(crate::builtin::definitions())
            .expect("built-in tag table must register cleanly")
    }

    /// Creates a registry from a list of definitions.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = TagDefinition>,
    ) -> Result<Self, RegistrationError> {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition)?;
        }
        Ok(registry)
    }

    /// Adds a tag definition.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::DuplicateName`] if the name is taken
    /// - [`RegistrationError::InvalidName`] if the name is empty or contains
    ///   whitespace, brackets, `=`, `/` or HTML metacharacters
    /// - [`RegistrationError::GroupCollision`] if the name maps to the same
    ///   scanner group as an existing tag
    /// - [`RegistrationError::InvalidTemplate`] for a malformed attribute
    ///   template
    /// - [`RegistrationError::Pattern`] if the argument pattern or the
    ///   scanner fails to compile
    pub fn register(&mut self, definition: TagDefinition) -> Result<(), RegistrationError> {
        let name = definition.name().to_string();
        validate_name(&name)?;

        if self.tags.contains_key(&name) {
            return Err(RegistrationError::DuplicateName(name));
        }

        let tag = RegisteredTag::compile(definition)?;
        if let Some(existing) = self.tags.values().find(|t| t.group == tag.group) {
            return Err(RegistrationError::GroupCollision {
                existing: existing.name().to_string(),
                group: tag.group.clone(),
                name,
            });
        }

        let scanner = Scanner::build(
            self.tags
                .keys()
                .map(String::as_str)
                .chain(std::iter::once(name.as_str())),
        )?;

        tracing::debug!(tag = %name, tags = self.tags.len() + 1, "registered tag");
        self.tags.insert(name, tag);
        self.scanner = scanner;
        Ok(())
    }

    /// Removes a tag, returning its definition. Unknown names are ignored.
    pub fn unregister(&mut self, name: &str) -> Option<TagDefinition> {
        let removed = self.tags.remove(name)?;
        match Scanner::build(self.tags.keys().map(String::as_str)) {
            Ok(scanner) => self.scanner = scanner,
            // The old scanner still finds the removed name, but tokens
            // naming no registered tag are passed through as text.
            Err(err) => tracing::warn!(tag = %name, error = %err, "kept previous scanner"),
        }
        tracing::debug!(tag = %name, tags = self.tags.len(), "unregistered tag");
        Some(removed.definition)
    }

    /// Looks up a tag definition by name.
    pub fn lookup(&self, name: &str) -> Option<&TagDefinition> {
        self.tags.get(name).map(|tag| &tag.definition)
    }

    /// Returns true if a tag with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Registered tag names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// True if no tags are registered.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Renders `input` to HTML. Shorthand for [`crate::parse`].
    pub fn parse(&self, input: &str) -> Result<String, ParseError> {
        crate::parser::parse(input, self)
    }

    /// Renders `input` with all recognized tags removed.
    ///
    /// See [`crate::strip`].
    pub fn strip(&self, input: &str) -> String {
        crate::parser::strip(input, self)
    }

    pub(crate) fn tag(&self, name: &str) -> Option<&RegisteredTag> {
        self.tags.get(name)
    }

    pub(crate) fn scanner(&self) -> &Scanner {
        &self.scanner
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.tags.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn validate_name(name: &str) -> Result<(), RegistrationError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.chars().any(char::is_whitespace) {
        Some("name contains whitespace")
    } else if name.contains(RESERVED_CHARS) {
        Some("name contains a reserved character")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(RegistrationError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
