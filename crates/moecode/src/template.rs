//! Attribute value templates.
//!
//! A template is a string with `{placeholder}` substitutions, the same
//! syntax as the simple format-string engines used elsewhere:
//!
//! - `{0}`, `{1}` - argument by position
//! - `{arg}`, `{body}`, `{uid}` - argument by name
//! - `{{` and `}}` - literal braces
//!
//! Templates are parsed once, when their tag is registered, so a syntax
//! error surfaces as a registration error instead of a parse-time failure.

use crate::args::Arguments;

/// A parsed attribute value template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Index(usize),
    Name(String),
}

impl Template {
    /// Parses a template, reporting unclosed or empty placeholders.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut var_name = String::new();
                    let mut found_close = false;

                    for inner_ch in chars.by_ref() {
                        if inner_ch == '}' {
                            found_close = true;
                            break;
                        }
                        var_name.push(inner_ch);
                    }

                    if !found_close {
                        return Err(format!("unclosed placeholder: {{{}", var_name));
                    }

                    let var_name = var_name.trim();
                    if var_name.is_empty() {
                        return Err("empty placeholder".to_string());
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(match var_name.parse::<usize>() {
                        Ok(index) => Segment::Index(index),
                        Err(_) => Segment::Name(var_name.to_string()),
                    });
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                _ => literal.push(ch),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Substitutes arguments into the template.
    ///
    /// Argument values are already escaped. Literal text comes from the tag
    /// table, which is trusted configuration.
    pub fn render(&self, args: &Arguments) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Index(index) => out.push_str(args.get(*index)),
                Segment::Name(name) => out.push_str(args.by_name(name)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Arguments {
        let mut args = Arguments::new();
        args.set(0, "alice");
        args.set(1, "hello");
        args.push_named("uid", "7");
        args
    }

    #[test]
    fn substitutes_by_index() {
        let tmpl = Template::parse("/u/{0}").unwrap();
        assert_eq!(tmpl.render(&args()), "/u/alice");
    }

    #[test]
    fn substitutes_by_name() {
        let tmpl = Template::parse("user-{uid} ({ body })").unwrap();
        assert_eq!(tmpl.render(&args()), "user-7 (hello)");
    }

    #[test]
    fn missing_values_render_empty() {
        let tmpl = Template::parse("[{9}{nope}]").unwrap();
        assert_eq!(tmpl.render(&args()), "[]");
    }

    #[test]
    fn escaped_braces() {
        let tmpl = Template::parse("{{{0}}}").unwrap();
        assert_eq!(tmpl.render(&args()), "{alice}");
    }

    #[test]
    fn stray_close_brace_is_literal() {
        let tmpl = Template::parse("a}b").unwrap();
        assert_eq!(tmpl.render(&args()), "a}b");
    }

    #[test]
    fn unclosed_placeholder_rejected() {
        let err = Template::parse("x{0").unwrap_err();
        assert!(err.contains("unclosed"));
    }

    #[test]
    fn empty_placeholder_rejected() {
        assert!(Template::parse("{ }").is_err());
    }
}
