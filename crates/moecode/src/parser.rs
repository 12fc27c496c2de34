//! The scanning loop.
//!
//! The input is escaped once, up front. From then on the parser only ever
//! copies slices of the escaped text or output produced by renderers, so no
//! user-supplied markup reaches the result.
//!
//! Each iteration asks the scanner for the next tag token after the cursor,
//! copies the text before it, handles the token, and moves the cursor past
//! it (and past any body the tag consumed). Open tags push frames onto a
//! [`TagStack`]; close tags pop frames down to the nearest frame with the
//! same name, closing everything above it on the way. Frames left at the end
//! of the input are closed innermost first.

use tracing::trace;

use crate::args::{Arguments, ARG_INDEX, BODY_INDEX};
use crate::body::{self, Lookahead, Resolution};
use crate::error::ParseError;
use crate::escape::escape;
use crate::options::TagOptions;
use crate::registry::{RegisteredTag, TagRegistry};
use crate::scanner::TagToken;
use crate::stack::{Frame, TagStack};

/// Renders markup in `input` to HTML using the tags in `registry`.
///
/// Unknown tags, unmatched close tags and stray brackets are passed through
/// as (escaped) text. The only error is a failing custom renderer.
///
/// ```rust
/// use moecode::{parse, TagRegistry};
///
/// let registry = TagRegistry::builtin();
/// assert_eq!(parse("[b][i]text[/b]", &registry).unwrap(), "<b><i>text</i></b>");
/// assert_eq!(parse("1 < 2 [b]hi", &registry).unwrap(), "1 &lt; 2 <b>hi</b>");
/// ```
pub fn parse(input: &str, registry: &TagRegistry) -> Result<String, ParseError> {
    Engine::new(registry, Mode::Html).run(input)
}

/// Resolves tags exactly like [`parse`] but emits no markup.
///
/// Bodies consumed as arguments (such as image URLs) are dropped, and the
/// remaining text is still escaped. Custom renderers are not called, so this
/// cannot fail.
///
/// ```rust
/// use moecode::{strip, TagRegistry};
///
/// let registry = TagRegistry::builtin();
/// assert_eq!(strip("[b]hi[/b] [img]a.png[/img]there", &registry), "hi there");
/// ```
pub fn strip(input: &str, registry: &TagRegistry) -> String {
    let mut engine = Engine::new(registry, Mode::Plain);
    engine.scan(&escape(input));
    engine.out
}

/// A registry bundled with the parse entry points.
///
/// Convenient when the tag table is configured once at startup and then
/// only used for rendering.
///
/// ```rust
/// use moecode::Parser;
///
/// let parser = Parser::builtin();
/// assert_eq!(parser.parse("[u]x[/u]").unwrap(), r#"<span class="underline">x</span>"#);
/// assert_eq!(parser.strip("[u]x[/u]"), "x");
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    registry: TagRegistry,
}

impl Parser {
    /// Wraps a configured registry.
    pub fn new(registry: TagRegistry) -> Self {
        Self { registry }
    }

    /// A parser over the built-in tags.
    pub fn builtin() -> Self {
        Self::new(TagRegistry::builtin())
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Mutable access for registering or removing tags.
    pub fn registry_mut(&mut self) -> &mut TagRegistry {
        &mut self.registry
    }

    pub fn into_registry(self) -> TagRegistry {
        self.registry
    }

    /// See [`parse`].
    pub fn parse(&self, input: &str) -> Result<String, ParseError> {
        parse(input, &self.registry)
    }

    /// See [`strip`].
    pub fn strip(&self, input: &str) -> String {
        strip(input, &self.registry)
    }
}

impl From<TagRegistry> for Parser {
    fn from(registry: TagRegistry) -> Self {
        Self::new(registry)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Html,
    Plain,
}

struct Engine<'r> {
    registry: &'r TagRegistry,
    mode: Mode,
    stack: TagStack<'r>,
    lookahead: Lookahead<'r>,
    out: String,
    failure: Option<ParseError>,
}

impl<'r> Engine<'r> {
    fn new(registry: &'r TagRegistry, mode: Mode) -> Self {
        Self {
            registry,
            mode,
            stack: TagStack::new(),
            lookahead: Lookahead::new(),
            out: String::new(),
            failure: None,
        }
    }

    fn run(mut self, input: &str) -> Result<String, ParseError> {
        let span = tracing::trace_span!("moecode::parse", len = input.len());
        let _guard = span.enter();

        self.scan(&escape(input));
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn scan(&mut self, text: &str) {
        self.out.reserve(text.len());
        let registry = self.registry;
        let scanner = registry.scanner();
        let mut pos = 0;

        while pos < text.len() && self.failure.is_none() {
            let Some(token) = scanner.next_token(text, pos) else {
                self.out.push_str(&text[pos..]);
                break;
            };

            self.out.push_str(&text[pos..token.start]);
            pos = if token.close {
                self.close_tag(&token, text);
                token.end
            } else {
                self.open_tag(&token, text)
            };
        }

        self.flush();
    }

    /// Handles an open tag and returns the offset to resume scanning at.
    fn open_tag(&mut self, token: &TagToken<'r, '_>, text: &str) -> usize {
        let registry = self.registry;
        let Some(tag) = registry.tag(token.name) else {
            self.out.push_str(&text[token.start..token.end]);
            return token.end;
        };
        let options = tag.options();

        let mut args = Arguments::new();
        if let Some(value) = token.arg {
            args.set(ARG_INDEX, value);
        }

        let mut pos = token.end;
        let mut complete = options.contains(TagOptions::SINGLE);

        if options.wants_body() {
            match body::resolve(tag, text, pos, &mut self.lookahead) {
                Resolution::Single => {
                    trace!(tag = token.name, "resolved as single tag");
                    complete = true;
                }
                Resolution::Body { text: body, end } => {
                    if options.contains(TagOptions::ALLOW_TOKEN_BODY_AS_FIRST_ARG)
                        && args.get(ARG_INDEX).is_empty()
                    {
                        args.set(ARG_INDEX, body);
                    }
                    if options.contains(TagOptions::TOKEN_BODY_AS_ARG) {
                        args.set(BODY_INDEX, body);
                        pos = end;
                        complete = true;
                    }
                }
            }
        }

        if let Some(pattern) = &tag.arg_pattern {
            let Some(caps) = pattern.captures(args.get(ARG_INDEX)) else {
                trace!(tag = token.name, "argument rejected by pattern, kept as text");
                self.out.push_str(&text[token.start..token.end]);
                return token.end;
            };
            let named: Vec<(&str, String)> = pattern
                .capture_names()
                .flatten()
                .map(|name| (name, caps.name(name).map_or("", |m| m.as_str()).to_string()))
                .collect();
            for (name, value) in named {
                args.set_named(name, value);
            }
        }

        if options.contains(TagOptions::NUMBER_ARG_TO_PX) && is_number(args.get(ARG_INDEX)) {
            let px = format!("{}px", args.get(ARG_INDEX));
            args.set(ARG_INDEX, px);
        }

        self.emit_open(tag, args);

        if complete {
            self.emit_close(tag);
            return pos;
        }

        let frame = Frame {
            tag,
            name: token.name,
        };

        if options.contains(TagOptions::NO_PARSE_INNER) {
            return match self.lookahead.next_close(tag, text, pos) {
                Some(close) => {
                    self.out.push_str(&text[pos..close.start]);
                    self.emit_close(tag);
                    close.end
                }
                None => {
                    self.out.push_str(&text[pos..]);
                    self.stack.push(frame);
                    text.len()
                }
            };
        }

        self.stack.push(frame);
        pos
    }

    fn close_tag(&mut self, token: &TagToken<'r, '_>, text: &str) {
        let Some(depth) = self.stack.depth_of(token.name) else {
            trace!(tag = token.name, "close tag without open frame, kept as text");
            self.out.push_str(&text[token.start..token.end]);
            return;
        };
        if depth > 0 {
            trace!(tag = token.name, depth, "force-closing inner frames");
        }

        while let Some(top) = self.stack.peek() {
            self.stack.pop();
            self.emit_close(top.tag);
            if top.tag.name() == token.name {
                break;
            }
            trace!(tag = top.name, by = token.name, "force-closed frame");
        }
    }

    fn flush(&mut self) {
        if !self.stack.is_empty() {
            trace!(frames = self.stack.len(), "closing unclosed frames at end of input");
        }
        while let Some(frame) = self.stack.pop() {
            self.emit_close(frame.tag);
        }
    }

    fn emit_open(&mut self, tag: &RegisteredTag, mut args: Arguments) {
        if self.mode == Mode::Plain || self.failure.is_some() {
            return;
        }
        if let Some(transform) = tag.definition.transform() {
            transform.transform(&mut args);
        }
        match tag.renderer.open(&args) {
            Ok(html) => self.out.push_str(&html),
            Err(err) => self.failure = Some(err.into()),
        }
    }

    fn emit_close(&mut self, tag: &RegisteredTag) {
        if self.mode == Mode::Html {
            self.out.push_str(&tag.renderer.close());
        }
    }
}

/// Whether `value` is a plain decimal number such as `12`, `1.5` or `.5`.
fn is_number(value: &str) -> bool {
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    match value.split_once('.') {
        None => !value.is_empty() && digits(value),
        Some((int, frac)) => digits(int) && !frac.is_empty() && digits(frac),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Element, TagDefinition};
    use crate::error::RenderError;

    fn builtin() -> TagRegistry {
        TagRegistry::builtin()
    }

    fn html(input: &str) -> String {
        parse(input, &builtin()).unwrap()
    }

    // ==================== Plain Text ====================

    mod text {
        use super::*;

        #[test]
        fn empty_input() {
            assert_eq!(html(""), "");
        }

        #[test]
        fn plain_text_unchanged() {
            assert_eq!(html("hello world"), "hello world");
        }

        #[test]
        fn html_is_escaped() {
            assert_eq!(
                html("<script>alert(1)</script>"),
                "&lt;script&gt;alert(1)&lt;/script&gt;"
            );
        }

        #[test]
        fn unknown_tags_pass_through() {
            assert_eq!(html("[blink]x[/blink]"), "[blink]x[/blink]");
        }

        #[test]
        fn stray_brackets_pass_through() {
            assert_eq!(html("a[0] = b[1]; [b"), "a[0] = b[1]; [b");
        }

        #[test]
        fn multiline_content() {
            assert_eq!(html("[b]line1\nline2[/b]"), "<b>line1\nline2</b>");
        }
    }

    // ==================== Stack Recovery ====================

    mod recovery {
        use super::*;

        #[test]
        fn nested_tags() {
            assert_eq!(html("[b][i]x[/i][/b]"), "<b><i>x</i></b>");
        }

        #[test]
        fn force_close_innermost_first() {
            assert_eq!(html("[b][i]text[/b]"), "<b><i>text</i></b>");
        }

        #[test]
        fn force_close_then_orphan() {
            assert_eq!(html("[b][i]x[/b][/i]"), "<b><i>x</i></b>[/i]");
        }

        #[test]
        fn unclosed_flushed_at_end() {
            assert_eq!(html("[b]hi"), "<b>hi</b>");
            assert_eq!(html("[b][i]hi"), "<b><i>hi</i></b>");
        }

        #[test]
        fn orphan_close_kept() {
            assert_eq!(html("hello[/b]"), "hello[/b]");
        }

        #[test]
        fn close_with_argument_still_closes() {
            assert_eq!(html("[b]hi[/b=what]"), "<b>hi</b>");
            assert_eq!(
                html("[url]x[/url=foo]"),
                r#"<a href="x">x</a>"#
            );
            assert_eq!(
                html("[code]a[/code=x]b"),
                "<pre><code>a</code></pre>b"
            );
        }

        #[test]
        fn long_run_of_unclosed_links() {
            let input = format!("{}[/url]", "[url]".repeat(20_000));
            let out = html(&input);
            assert!(out.starts_with("<a></a><a></a>"));
            assert_eq!(out.matches("<a></a>").count(), 20_000);
        }

        #[test]
        fn close_matches_nearest_frame() {
            assert_eq!(html("[b]a[b]b[/b]c[/b]"), "<b>a<b>b</b>c</b>");
        }
    }

    // ==================== Arguments ====================

    mod arguments {
        use super::*;

        #[test]
        fn css_from_argument() {
            assert_eq!(
                html("[color=red]x[/color]"),
                r#"<span style="color: red;">x</span>"#
            );
        }

        #[test]
        fn css_omitted_without_argument() {
            assert_eq!(html("[color]x[/color]"), "<span>x</span>");
        }

        #[test]
        fn number_gets_px() {
            assert_eq!(
                html("[size=12]x[/size]"),
                r#"<span style="font-size: 12px;">x</span>"#
            );
        }

        #[test]
        fn trailing_dot_gets_no_px() {
            assert_eq!(
                html("[size=1.]x[/size]"),
                r#"<span style="font-size: 1.;">x</span>"#
            );
        }

        #[test]
        fn units_left_alone() {
            assert_eq!(
                html("[size=1.5em]x[/size]"),
                r#"<span style="font-size: 1.5em;">x</span>"#
            );
        }

        #[test]
        fn quotes_in_argument_escaped() {
            let out = html(r#"[url=http://a" onclick="x]y[/url]"#);
            assert_eq!(
                out,
                r#"<a href="http://a&quot; onclick=&quot;x">y</a>"#
            );
        }

        #[test]
        fn is_number_accepts_decimals_only() {
            assert!(is_number("12"));
            assert!(is_number("1.5"));
            assert!(is_number(".5"));
            assert!(!is_number(""));
            assert!(!is_number("1."));
            assert!(!is_number("."));
            assert!(!is_number("12px"));
            assert!(!is_number("-3"));
            assert!(!is_number("1.2.3"));
            assert!(!is_number("inf"));
        }
    }

    // ==================== Body Resolution ====================

    mod bodies {
        use super::*;

        #[test]
        fn url_body_becomes_href() {
            assert_eq!(
                html("[url]http://x[/url]"),
                r#"<a href="http://x">http://x</a>"#
            );
        }

        #[test]
        fn explicit_value_wins_over_body() {
            assert_eq!(
                html("[url=http://a]http://b[/url]"),
                r#"<a href="http://a">http://b</a>"#
            );
        }

        #[test]
        fn empty_value_falls_back_to_body() {
            assert_eq!(
                html("[url=]http://x[/url]"),
                r#"<a href="http://x">http://x</a>"#
            );
        }

        #[test]
        fn empty_url_is_empty_anchor() {
            assert_eq!(html("[url][/url]"), "<a></a>");
        }

        #[test]
        fn unclosed_url_is_single() {
            assert_eq!(
                html("[url=http://a] text"),
                r#"<a href="http://a"></a> text"#
            );
        }

        #[test]
        fn url_reopened_before_close_is_single() {
            assert_eq!(
                html("[url=http://a] [url]http://b[/url]"),
                r#"<a href="http://a"></a> <a href="http://b">http://b</a>"#
            );
        }

        #[test]
        fn img_body_as_src_and_title() {
            assert_eq!(
                html("[img]http://x/y.png[/img]"),
                r#"<img src="http://x/y.png" title="http://x/y.png">"#
            );
        }

        #[test]
        fn img_with_explicit_src() {
            assert_eq!(
                html("[img=a.png]A cat[/img]"),
                r#"<img src="a.png" title="A cat">"#
            );
        }

        #[test]
        fn img_without_close_is_single() {
            assert_eq!(html("[img=a.png] hi"), r#"<img src="a.png"> hi"#);
        }

        #[test]
        fn img_inside_url() {
            assert_eq!(
                html("[url=http://g/][img]http://g/logo.gif[/img][/url]"),
                r#"<a href="http://g/"><img src="http://g/logo.gif" title="http://g/logo.gif"></a>"#
            );
        }
    }

    // ==================== No-Parse Regions ====================

    mod no_parse {
        use super::*;

        #[test]
        fn code_keeps_inner_tags() {
            assert_eq!(
                html("[code][b]not bold[/b][/code]"),
                "<pre><code>[b]not bold[/b]</code></pre>"
            );
        }

        #[test]
        fn noparse_has_no_markup() {
            assert_eq!(html("[noparse][i]x[/i][/noparse]!"), "[i]x[/i]!");
        }

        #[test]
        fn unclosed_code_runs_to_end() {
            assert_eq!(html("[code][b]x"), "<pre><code>[b]x</code></pre>");
        }

        #[test]
        fn inner_text_still_escaped() {
            assert_eq!(html("[pre]<b>[/pre]"), "<pre>&lt;b&gt;</pre>");
        }
    }

    // ==================== Custom Rendering ====================

    mod custom {
        use super::*;

        fn mention_registry() -> TagRegistry {
            let mut reg = TagRegistry::new();
            reg.register(
                TagDefinition::new("user")
                    .with_options(
                        TagOptions::TOKEN_BODY_AS_ARG | TagOptions::ALLOW_TOKEN_BODY_AS_FIRST_ARG,
                    )
                    .with_transform(|args: &mut Arguments| {
                        let uid = match args.get(0) {
                            "alice" => "1",
                            "bob" => "2",
                            _ => "",
                        };
                        args.push_named("uid", uid);
                    })
                    .with_element(Element::new("span").class("at-tag").templated("data-uid", "{uid}")),
            )
            .unwrap();
            reg.register(
                TagDefinition::new("fail").with_renderer(|_: &Arguments| -> Result<String, RenderError> {
                    Err(RenderError::renderer("fail", "boom"))
                }),
            )
            .unwrap();
            reg
        }

        #[test]
        fn transform_feeds_template() {
            let reg = mention_registry();
            assert_eq!(
                parse("[user]alice[/user]!", &reg).unwrap(),
                r#"<span class="at-tag" data-uid="1"></span>!"#
            );
        }

        #[test]
        fn empty_template_value_omitted() {
            let reg = mention_registry();
            assert_eq!(
                parse("[user]carol[/user]", &reg).unwrap(),
                r#"<span class="at-tag"></span>"#
            );
        }

        #[test]
        fn renderer_failure_aborts() {
            let reg = mention_registry();
            let err = parse("ok [fail]x[/fail]", &reg).unwrap_err();
            assert_eq!(err, ParseError::Render(RenderError::renderer("fail", "boom")));
        }

        fn pattern_registry() -> TagRegistry {
            let mut reg = TagRegistry::new();
            reg.register(
                TagDefinition::new("at")
                    .with_options(
                        TagOptions::TOKEN_BODY_AS_ARG | TagOptions::ALLOW_TOKEN_BODY_AS_FIRST_ARG,
                    )
                    .with_pattern(r"^@(?P<user>[a-z]+)(?:/(?P<room>[a-z]+))?$")
                    .with_element(
                        Element::new("span")
                            .class("at-tag")
                            .templated("data-user", "{user}")
                            .templated("data-room", "{room}"),
                    ),
            )
            .unwrap();
            reg
        }

        #[test]
        fn pattern_captures_become_named_args() {
            let reg = pattern_registry();
            assert_eq!(
                parse("[at]@alice/lobby[/at]", &reg).unwrap(),
                r#"<span class="at-tag" data-room="lobby" data-user="alice"></span>"#
            );
        }

        #[test]
        fn unmatched_optional_group_is_empty() {
            let reg = pattern_registry();
            assert_eq!(
                parse("[at=@bob]", &reg).unwrap(),
                r#"<span class="at-tag" data-user="bob"></span>"#
            );
        }

        #[test]
        fn pattern_mismatch_keeps_tag_as_text() {
            let reg = pattern_registry();
            assert_eq!(
                parse("[at]Alice![/at] ok", &reg).unwrap(),
                "[at]Alice![/at] ok"
            );
        }

        #[test]
        fn strip_skips_renderers() {
            let reg = mention_registry();
            assert_eq!(strip("ok [fail]x[/fail]", &reg), "ok x");
        }
    }

    // ==================== Strip Mode ====================

    mod plain {
        use super::*;

        #[test]
        fn removes_markup() {
            assert_eq!(strip("[b][i]a[/i][/b] [u]b", &builtin()), "a b");
        }

        #[test]
        fn keeps_unknown_and_orphans() {
            assert_eq!(strip("[x]a[/x][/b]", &builtin()), "[x]a[/x][/b]");
        }

        #[test]
        fn keeps_no_parse_content() {
            assert_eq!(strip("[code][b]x[/b][/code]", &builtin()), "[b]x[/b]");
        }

        #[test]
        fn still_escapes() {
            assert_eq!(strip("[b]<i>[/b]", &builtin()), "&lt;i&gt;");
        }
    }

    // ==================== Parser Wrapper ====================

    mod wrapper {
        use super::*;

        #[test]
        fn default_parser_has_no_tags() {
            let parser = Parser::default();
            assert!(parser.registry().is_empty());
            assert_eq!(parser.parse("[b]x[/b]").unwrap(), "[b]x[/b]");
        }

        #[test]
        fn registry_mut_changes_output() {
            let mut parser = Parser::builtin();
            parser
                .registry_mut()
                .register(TagDefinition::new("mark").with_element(Element::new("mark")))
                .unwrap();
            assert_eq!(parser.parse("[mark]x[/mark]").unwrap(), "<mark>x</mark>");
            assert!(parser.into_registry().contains("mark"));
        }
    }

    // ==================== Property Tests ====================

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn text_without_brackets_only_escaped(s in "[^\\[\\]]{0,64}") {
                let out = html(&s);
                prop_assert_eq!(out, escape(&s).into_owned());
            }

            #[test]
            fn arbitrary_input_terminates(s in "(\\[/?(b|i|url|img|code)(=[a-z]{0,3})?\\]|[a-z <>]){0,40}") {
                let out = html(&s);
                prop_assert!(!out.contains('<') || out.contains("</") || out.contains("<img"));
            }

            #[test]
            fn strip_never_emits_tags(s in "(\\[/?(b|i|u|s)\\]|[a-z ]){0,40}") {
                let out = strip(&s, &builtin());
                prop_assert!(!out.contains('<'));
            }
        }
    }
}
