//! Moecode - BBCode-style chat markup rendered to safe HTML.
//!
//! Moecode turns bracketed tags embedded in user text (`[b]bold[/b]`,
//! `[url]http://...[/url]`) into HTML fragments without letting any user
//! supplied HTML through. It is built for chat messages:
//!
//! - Input is HTML-escaped before any tag is recognized
//! - Only registered tags render; everything else stays literal text
//! - Malformed markup never fails: mismatched close tags force-close the
//!   tags inside them, and unclosed tags are closed at the end
//! - Tags are plain data, loadable from YAML, with custom renderers where
//!   data is not enough
//!
//! # Quick Start
//!
//! ```rust
//! use moecode::TagRegistry;
//!
//! let registry = TagRegistry::builtin();
//!
//! let html = registry.parse("[b]hi [i]there[/b] <3").unwrap();
//! assert_eq!(html, "<b>hi <i>there</i></b> &lt;3");
//!
//! let html = registry.parse("[url]http://example.com[/url]").unwrap();
//! assert_eq!(html, r#"<a href="http://example.com">http://example.com</a>"#);
//! ```
//!
//! # Defining Tags
//!
//! A [`TagDefinition`] pairs [`TagOptions`] with the [`Element`]s the tag
//! renders as. Element attributes and CSS properties are filled from the
//! tag's [`Arguments`]: slot 0 is the `=value`, slot 1 is the body for tags
//! that take it as an argument.
//!
//! ```rust
//! use moecode::{Element, TagDefinition, TagOptions, TagRegistry};
//!
//! let mut registry = TagRegistry::builtin();
//! registry
//!     .register(
//!         TagDefinition::new("quote")
//!             .with_options(TagOptions::ALLOW_TOKEN_BODY_AS_FIRST_ARG)
//!             .with_element(Element::new("blockquote").templated("cite", "{arg}")),
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     registry.parse("[quote=bob]hello[/quote]").unwrap(),
//!     r#"<blockquote cite="bob">hello</blockquote>"#
//! );
//! ```
//!
//! Tables can also be loaded with [`TagRegistry::from_yaml`]; see
//! [`config`].
//!
//! # Tag Options
//!
//! | Option | Effect |
//! |--------|--------|
//! | `SINGLE` | No body, no close tag |
//! | `POSSIBLE_SINGLE` | Single unless a close tag follows before another open |
//! | `HTML_SINGLE` | No closing element (`<img>`) |
//! | `NO_PARSE_INNER` | Body copied verbatim up to the close tag |
//! | `TOKEN_BODY_AS_ARG` | Body becomes argument 1 instead of content |
//! | `ALLOW_TOKEN_BODY_AS_FIRST_ARG` | Body becomes argument 0 if no `=value` |
//! | `NUMBER_ARG_TO_PX` | Numeric argument 0 gets a `px` suffix |

mod args;
mod body;
mod definition;
mod error;
mod escape;
mod options;
mod parser;
mod registry;
mod render;
mod scanner;
mod stack;
mod template;

pub mod builtin;
pub mod config;

// Re-export public API
pub use args::{Arguments, ARG_INDEX, BODY_INDEX};
pub use definition::{Element, TagDefinition};
pub use error::{ConfigError, ParseError, RegistrationError, RenderError};
pub use escape::{escape, unescape};
pub use options::TagOptions;
pub use parser::{parse, strip, Parser};
pub use registry::TagRegistry;
pub use render::{ArgumentTransform, Declarative, TagRenderer};
pub use template::Template;
