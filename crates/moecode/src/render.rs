//! Rendering resolved tags into HTML.
//!
//! Every registered tag renders through a [`TagRenderer`]. Tags configured
//! with a custom renderer use it directly; all others get a
//! [`Declarative`] renderer compiled from their [`Element`] list when the
//! tag is registered.

use std::fmt::Write;

use crate::args::Arguments;
use crate::definition::Element;
use crate::error::{RegistrationError, RenderError};
use crate::escape;
use crate::template::Template;

/// Produces the HTML emitted for a tag.
///
/// `open` runs once per resolved open tag, `close` once per closed frame
/// (or right after `open` for tags that have no body). Arguments arrive
/// HTML-escaped; whatever `open` returns is emitted verbatim.
///
/// Closures implement this trait, rendering only the open side:
///
/// ```rust
/// use moecode::{Arguments, RenderError, TagDefinition, TagOptions, TagRegistry};
///
/// let mut registry = TagRegistry::new();
/// registry
///     .register(
///         TagDefinition::new("hr")
///             .with_options(TagOptions::SINGLE)
///             .with_renderer(|_: &Arguments| -> Result<String, RenderError> {
///                 Ok("<hr>".to_string())
///             }),
///     )
///     .unwrap();
/// assert_eq!(registry.parse("a[hr]b").unwrap(), "a<hr>b");
/// ```
pub trait TagRenderer: Send + Sync {
    /// Renders the opening side of the tag.
    fn open(&self, args: &Arguments) -> Result<String, RenderError>;

    /// Renders the closing side of the tag.
    fn close(&self) -> String {
        String::new()
    }
}

impl<F> TagRenderer for F
where
    F: Fn(&Arguments) -> Result<String, RenderError> + Send + Sync,
{
    fn open(&self, args: &Arguments) -> Result<String, RenderError> {
        self(args)
    }
}

/// Rewrites a tag's arguments before it is rendered.
///
/// A typical use maps a user name captured from `[mention=alice]` to a user
/// id stored under a new name with [`Arguments::push_named`].
pub trait ArgumentTransform: Send + Sync {
    fn transform(&self, args: &mut Arguments);
}

impl<F> ArgumentTransform for F
where
    F: Fn(&mut Arguments) + Send + Sync,
{
    fn transform(&self, args: &mut Arguments) {
        self(args)
    }
}

/// The renderer built from a tag's element list.
#[derive(Debug, Clone)]
pub struct Declarative {
    elements: Vec<CompiledElement>,
    close: String,
}

#[derive(Debug, Clone)]
struct CompiledElement {
    name: String,
    class: Option<String>,
    attributes: Vec<(usize, String)>,
    templates: Vec<(String, Template)>,
    css_properties: Vec<(usize, String)>,
}

impl Declarative {
    /// Compiles an element list, parsing every attribute template.
    ///
    /// `html_single` suppresses the closing elements.
    pub fn compile(
        tag: &str,
        elements: &[Element],
        html_single: bool,
    ) -> Result<Self, RegistrationError> {
        let mut compiled = Vec::with_capacity(elements.len());
        for element in elements {
            let mut templates = Vec::with_capacity(element.templates.len());
            for (attribute, source) in &element.templates {
                let template =
                    Template::parse(source).map_err(|message| RegistrationError::InvalidTemplate {
                        tag: tag.to_string(),
                        attribute: attribute.clone(),
                        message,
                    })?;
                templates.push((attribute.clone(), template));
            }

            compiled.push(CompiledElement {
                name: element.name.clone(),
                class: (!element.classes.is_empty()).then(|| element.classes.join(" ")),
                attributes: element
                    .attributes
                    .iter()
                    .map(|(index, name)| (*index, name.clone()))
                    .collect(),
                templates,
                css_properties: element
                    .css_properties
                    .iter()
                    .map(|(index, prop)| (*index, prop.clone()))
                    .collect(),
            });
        }

        let close = if html_single {
            String::new()
        } else {
            compiled
                .iter()
                .rev()
                .map(|el| format!("</{}>", el.name))
                .collect()
        };

        Ok(Self {
            elements: compiled,
            close,
        })
    }
}

impl TagRenderer for Declarative {
    fn open(&self, args: &Arguments) -> Result<String, RenderError> {
        let mut out = String::new();
        for el in &self.elements {
            out.push('<');
            out.push_str(&el.name);

            if let Some(class) = &el.class {
                let _ = write!(out, " class=\"{}\"", class);
            }

            for (index, attribute) in &el.attributes {
                let value = args.get(*index);
                if !value.is_empty() {
                    let _ = write!(out, " {}=\"{}\"", attribute, escape::attribute_value(value));
                }
            }

            for (attribute, template) in &el.templates {
                let value = template.render(args);
                if !value.is_empty() {
                    let _ = write!(out, " {}=\"{}\"", attribute, escape::attribute_value(&value));
                }
            }

            let declarations: Vec<String> = el
                .css_properties
                .iter()
                .filter(|(index, _)| !args.get(*index).is_empty())
                .map(|(index, prop)| {
                    format!("{}: {};", prop, escape::attribute_value(args.get(*index)))
                })
                .collect();
            if !declarations.is_empty() {
                let _ = write!(out, " style=\"{}\"", declarations.join(" "));
            }

            out.push('>');
        }
        Ok(out)
    }

    fn close(&self) -> String {
        self.close.clone()
    }
}
