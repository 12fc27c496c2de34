//! Error types for the moecode crate.
//!
//! Errors come in two tiers. [`RegistrationError`] and [`ConfigError`] are
//! raised while a tag table is being built and never during parsing.
//! [`ParseError`] is the only error a parse can return, and it only happens
//! when a custom renderer fails.

use thiserror::Error;

/// Errors raised when adding a tag definition to a registry.
///
/// A failed registration leaves the registry exactly as it was.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// A tag with the same name is already registered.
    #[error("tag '{0}' is already registered")]
    DuplicateName(String),

    /// The tag name cannot appear inside a bracket token.
    #[error("invalid tag name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Two tag names map to the same capture group in the scanner pattern.
    #[error("tag '{name}' collides with tag '{existing}' (capture group '{group}')")]
    GroupCollision {
        name: String,
        existing: String,
        group: String,
    },

    /// An attribute value template could not be parsed.
    #[error("invalid template for attribute '{attribute}' of tag '{tag}': {message}")]
    InvalidTemplate {
        tag: String,
        attribute: String,
        message: String,
    },

    /// The combined scanner pattern failed to compile.
    #[error("invalid tag pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised while rendering a resolved tag.
///
/// Attribute templates are checked when their tag is registered and cannot
/// fail at render time, so custom renderers are the only source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A custom renderer reported a failure.
    #[error("renderer for tag '{tag}' failed: {message}")]
    Renderer { tag: String, message: String },
}

impl RenderError {
    /// Creates a renderer failure. Custom renderers return this.
    pub fn renderer(tag: impl Into<String>, message: impl Into<String>) -> Self {
        RenderError::Renderer {
            tag: tag.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by [`parse`](crate::parse).
///
/// Malformed markup is never an error; it is passed through as text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Rendering a tag failed, aborting the whole parse.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors raised when loading a tag table from YAML.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid YAML or does not match the table schema.
    #[error("failed to parse tag table: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An option name that is not a known flag.
    #[error("unknown option '{option}' on tag '{tag}'")]
    UnknownOption { tag: String, option: String },

    /// A definition from the table was rejected by the registry.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}
