//! Tag definitions: the configuration data the engine runs on.
//!
//! A [`TagDefinition`] says how one bracket tag is scanned (its
//! [`TagOptions`]) and how it is rendered: either declaratively through a
//! list of [`Element`]s, or by a custom [`TagRenderer`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::options::TagOptions;
use crate::render::{ArgumentTransform, TagRenderer};

/// One HTML element emitted for a tag.
///
/// ```rust
/// use moecode::Element;
///
/// let anchor = Element::new("a")
///     .class("link")
///     .attribute(0, "href")
///     .templated("data-user", "{uid}");
/// assert_eq!(anchor.name, "a");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Element {
    /// Element name, e.g. `span`.
    pub name: String,

    /// Class names, joined with spaces into one `class` attribute.
    #[serde(default)]
    pub classes: Vec<String>,

    /// Argument index to attribute name. Empty arguments are skipped.
    #[serde(default)]
    pub attributes: BTreeMap<usize, String>,

    /// Argument index to CSS property name, collected into `style`.
    #[serde(default, rename = "css")]
    pub css_properties: BTreeMap<usize, String>,

    /// Attribute name to value template (see [`Template`](crate::Template)).
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
}

impl Element {
    /// Creates an element with no classes or attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a class name.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Maps argument `index` to attribute `name`.
    pub fn attribute(mut self, index: usize, name: impl Into<String>) -> Self {
        self.attributes.insert(index, name.into());
        self
    }

    /// Maps argument `index` to CSS property `property`.
    pub fn css(mut self, index: usize, property: impl Into<String>) -> Self {
        self.css_properties.insert(index, property.into());
        self
    }

    /// Adds an attribute whose value is rendered from a template.
    pub fn templated(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(name.into(), template.into());
        self
    }
}

/// A tag the parser knows about.
///
/// # Example
///
/// ```rust
/// use moecode::{Element, TagDefinition, TagOptions, TagRegistry};
///
/// let mut registry = TagRegistry::new();
/// registry
///     .register(
///         TagDefinition::new("spoiler")
///             .with_element(Element::new("span").class("spoiler")),
///     )
///     .unwrap();
///
/// assert_eq!(
///     registry.parse("[spoiler]it was him[/spoiler]").unwrap(),
///     r#"<span class="spoiler">it was him</span>"#
/// );
/// ```
#[derive(Clone)]
pub struct TagDefinition {
    name: String,
    options: TagOptions,
    pattern: Option<String>,
    elements: Vec<Element>,
    renderer: Option<Arc<dyn TagRenderer>>,
    transform: Option<Arc<dyn ArgumentTransform>>,
}

impl TagDefinition {
    /// Creates a definition with no options and no elements.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: TagOptions::NONE,
            pattern: None,
            elements: Vec::new(),
            renderer: None,
            transform: None,
        }
    }

    /// Sets the option flags.
    pub fn with_options(mut self, options: TagOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets a regex that argument 0 must match.
    ///
    /// The pattern runs against the escaped argument once the body has been
    /// resolved, so `[mention]alice[/mention]` and `[mention=alice]` are
    /// checked alike. Each named group becomes a named argument; groups that
    /// did not take part in the match are set to `""`. When the pattern does
    /// not match, the open tag is kept as text. Anchor it with `^...$` to
    /// match the whole argument.
    ///
    /// ```rust
    /// use moecode::{Element, TagDefinition, TagOptions, TagRegistry};
    ///
    /// let mut registry = TagRegistry::new();
    /// registry
    ///     .register(
    ///         TagDefinition::new("issue")
    ///             .with_options(TagOptions::SINGLE)
    ///             .with_pattern(r"^(?P<repo>[a-z]+)#(?P<number>\d+)$")
    ///             .with_element(Element::new("a").templated("href", "/{repo}/issues/{number}")),
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     registry.parse("[issue=moe#12]").unwrap(),
    ///     r#"<a href="/moe/issues/12"></a>"#
    /// );
    /// assert_eq!(registry.parse("[issue=moe]").unwrap(), "[issue=moe]");
    /// ```
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Appends an element. Elements nest in the order they are added.
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Replaces the element list.
    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    /// Sets a custom renderer, replacing the declarative elements.
    pub fn with_renderer(mut self, renderer: impl TagRenderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Sets a transform applied to the arguments before rendering.
    pub fn with_transform(mut self, transform: impl ArgumentTransform + 'static) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// The tag name, as written between the brackets.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The option flags.
    pub fn options(&self) -> TagOptions {
        self.options
    }

    /// The argument pattern, if any.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// The declarative elements.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The custom renderer, if any.
    pub fn renderer(&self) -> Option<&Arc<dyn TagRenderer>> {
        self.renderer.as_ref()
    }

    /// The argument transform, if any.
    pub fn transform(&self) -> Option<&dyn ArgumentTransform> {
        self.transform.as_deref()
    }
}

impl fmt::Debug for TagDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagDefinition")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("pattern", &self.pattern)
            .field("elements", &self.elements)
            .field("renderer", &self.renderer.is_some())
            .field("transform", &self.transform.is_some())
            .finish()
    }
}
