//! HTML escaping of user text.
//!
//! Thin wrappers over `html-escape` fixing which characters are encoded:
//! `<`, `>`, `&`, `'` and `"`.

use std::borrow::Cow;

/// Escapes `<`, `>`, `&`, `'` and `"`.
///
/// ```rust
/// assert_eq!(moecode::escape(r#"<b>"hi"</b>"#), "&lt;b&gt;&quot;hi&quot;&lt;/b&gt;");
/// ```
pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

/// Decodes HTML entities, the inverse of [`escape`].
pub fn unescape(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

/// Normalizes a value for use inside a quoted attribute.
///
/// Values cut from escaped input come back unchanged. Values inserted by
/// argument transforms get their raw metacharacters encoded.
pub(crate) fn attribute_value(value: &str) -> String {
    escape(&unescape(value)).into_owned()
}
