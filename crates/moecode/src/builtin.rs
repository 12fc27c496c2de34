//! The built-in chat tag table.
//!
//! | Tag | Options | Output |
//! |---|---|---|
//! | `b`, `i`, `s`, `samp`, `q` | | same-named element |
//! | `u` | | `<span class="underline">` |
//! | `pre` | no-parse | `<pre>` |
//! | `code` | no-parse | `<pre><code>` |
//! | `noparse` | no-parse | nothing |
//! | `color`, `colour` | | `<span style="color: ...;">` |
//! | `size` | number to px | `<span style="font-size: ...;">` |
//! | `url` | body as arg 0, possibly single | `<a href="...">` |
//! | `img` | body as args, possibly single, no close | `<img src="..." title="...">` |

use crate::definition::{Element, TagDefinition};
use crate::options::TagOptions;

/// Returns the built-in tag definitions.
///
/// The table is plain data; callers may edit it before building a registry.
///
/// ```rust
/// use moecode::{builtin, TagRegistry};
///
/// let definitions = builtin::definitions()
///     .into_iter()
///     .filter(|def| def.name() != "img");
/// let registry = TagRegistry::from_definitions(definitions).unwrap();
/// assert!(!registry.contains("img"));
/// ```
pub fn definitions() -> Vec<TagDefinition> {
    let mut defs: Vec<TagDefinition> = ["b", "i", "s", "samp", "q"]
        .into_iter()
        .map(|name| TagDefinition::new(name).with_element(Element::new(name)))
        .collect();

    defs.push(TagDefinition::new("u").with_element(Element::new("span").class("underline")));

    defs.push(
        TagDefinition::new("pre")
            .with_options(TagOptions::NO_PARSE_INNER)
            .with_element(Element::new("pre")),
    );
    defs.push(
        TagDefinition::new("code")
            .with_options(TagOptions::NO_PARSE_INNER)
            .with_elements(vec![Element::new("pre"), Element::new("code")]),
    );
    defs.push(TagDefinition::new("noparse").with_options(TagOptions::NO_PARSE_INNER));

    for name in ["color", "colour"] {
        defs.push(TagDefinition::new(name).with_element(Element::new("span").css(0, "color")));
    }
    defs.push(
        TagDefinition::new("size")
            .with_options(TagOptions::NUMBER_ARG_TO_PX)
            .with_element(Element::new("span").css(0, "font-size")),
    );

    defs.push(
        TagDefinition::new("url")
            .with_options(TagOptions::ALLOW_TOKEN_BODY_AS_FIRST_ARG | TagOptions::POSSIBLE_SINGLE)
            .with_element(Element::new("a").attribute(0, "href")),
    );
    defs.push(
        TagDefinition::new("img")
            .with_options(
                TagOptions::ALLOW_TOKEN_BODY_AS_FIRST_ARG
                    | TagOptions::TOKEN_BODY_AS_ARG
                    | TagOptions::POSSIBLE_SINGLE
                    | TagOptions::HTML_SINGLE,
            )
            .with_element(Element::new("img").attribute(0, "src").attribute(1, "title")),
    );

    defs
}
