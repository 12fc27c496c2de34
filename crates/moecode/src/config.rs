//! Loading tag tables from YAML.
//!
//! A table maps tag names to their options and elements:
//!
//! ```yaml
//! spoiler:
//!   options: [possible_single]
//!   elements:
//!     - name: span
//!       classes: [spoiler]
//!       attributes: {0: title}
//!       templates: {data-by: "{arg}"}
//! hr:
//!   options: [single, html_single]
//!   elements:
//!     - name: hr
//! issue:
//!   options: [single]
//!   pattern: '^(?P<number>\d+)$'
//!   elements:
//!     - name: a
//!       templates: {href: "/issues/{number}"}
//! ```
//!
//! Option names are the snake_case form of the [`TagOptions`] constants.
//! `pattern` is an argument pattern, as set by
//! [`TagDefinition::with_pattern`].
//! Element keys are `name`, `classes`, `attributes`, `css` and `templates`;
//! anything else is rejected. Custom renderers and transforms are code, so
//! they are attached to definitions after loading.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::definition::{Element, TagDefinition};
use crate::error::ConfigError;
use crate::options::TagOptions;
use crate::registry::TagRegistry;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TagEntry {
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    elements: Vec<Element>,
}

/// Parses a YAML tag table into definitions, sorted by name.
///
/// An empty document is an empty table.
///
/// # Errors
///
/// [`ConfigError::Yaml`] for malformed YAML or unknown keys,
/// [`ConfigError::UnknownOption`] for an option name that is not a flag.
pub fn parse_table(yaml: &str) -> Result<Vec<TagDefinition>, ConfigError> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }

    let table: BTreeMap<String, Option<TagEntry>> = serde_yaml::from_str(yaml)?;
    table
        .into_iter()
        .map(|(name, entry)| {
            let entry = entry.unwrap_or_default();
            let options = parse_options(&name, &entry.options)?;
            let mut definition = TagDefinition::new(name)
                .with_options(options)
                .with_elements(entry.elements);
            if let Some(pattern) = entry.pattern {
                definition = definition.with_pattern(pattern);
            }
            Ok(definition)
        })
        .collect()
}

fn parse_options(tag: &str, names: &[String]) -> Result<TagOptions, ConfigError> {
    names.iter().try_fold(TagOptions::NONE, |acc, name| {
        TagOptions::from_name(name)
            .map(|flag| acc | flag)
            .ok_or_else(|| ConfigError::UnknownOption {
                tag: tag.to_string(),
                option: name.clone(),
            })
    })
}

impl TagRegistry {
    /// Creates a registry from a YAML tag table.
    ///
    /// ```rust
    /// use moecode::TagRegistry;
    ///
    /// let registry = TagRegistry::from_yaml("spoiler:\n  elements:\n    - name: del\n").unwrap();
    /// assert_eq!(registry.parse("[spoiler]x[/spoiler]").unwrap(), "<del>x</del>");
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.extend_from_yaml(yaml)?;
        Ok(registry)
    }

    /// Registers every tag in a YAML table, returning how many were added.
    ///
    /// The whole table is parsed before anything is registered, but
    /// registration stops at the first rejected definition; tags registered
    /// before it stay.
    pub fn extend_from_yaml(&mut self, yaml: &str) -> Result<usize, ConfigError> {
        let definitions = parse_table(yaml)?;
        let count = definitions.len();
        for definition in definitions {
            self.register(definition)?;
        }
        tracing::debug!(count, "loaded tag table");
        Ok(count)
    }
}
