//! Deciding what text belongs to a tag.
//!
//! Tags that take their body as an argument, or that may or may not have a
//! close tag, look ahead before they are rendered. The lookahead only uses
//! the tag's own open and close patterns, never the full scanner, so it does
//! not depend on what other tags are registered.
//!
//! Lookahead results are cached per tag for the length of one parse. The
//! cursor only moves forward, so the nearest match found from an earlier
//! offset stays the nearest match until the cursor passes it. That keeps a
//! run of unclosed tags linear instead of rescanning the rest of the input
//! for each one.

use std::collections::HashMap;
use std::ops::Range;

use regex::Regex;

use crate::options::TagOptions;
use crate::registry::RegisteredTag;

/// Outcome of looking ahead from an open tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution<'t> {
    /// The tag has no body.
    Single,
    /// The tag owns `text`; `end` is just past its close tag, or the end of
    /// input when there is none.
    Body { text: &'t str, end: usize },
}

/// The nearest match of one pattern at or after `from`.
#[derive(Debug, Clone, Default)]
struct Cached {
    from: usize,
    found: Option<Range<usize>>,
}

impl Cached {
    fn covers(&self, from: usize) -> bool {
        self.from <= from && self.found.as_ref().map_or(true, |m| m.start >= from)
    }
}

#[derive(Debug, Default)]
struct TagCache {
    close: Option<Cached>,
    open: Option<Cached>,
}

/// Per-parse cache of open and close tag positions.
#[derive(Debug, Default)]
pub(crate) struct Lookahead<'r> {
    tags: HashMap<&'r str, TagCache>,
}

impl<'r> Lookahead<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nearest `[/name]` or `[/name=...]` at or after `from`.
    pub fn next_close(&mut self, tag: &'r RegisteredTag, text: &str, from: usize) -> Option<Range<usize>> {
        let entry = self.tags.entry(tag.name()).or_default();
        find_cached(&mut entry.close, &tag.close_pattern, text, from)
    }

    /// Nearest `[name]` or `[name=...]` at or after `from`.
    fn next_open(&mut self, tag: &'r RegisteredTag, text: &str, from: usize) -> Option<Range<usize>> {
        let entry = self.tags.entry(tag.name()).or_default();
        find_cached(&mut entry.open, &tag.open_pattern, text, from)
    }
}

fn find_cached(slot: &mut Option<Cached>, pattern: &Regex, text: &str, from: usize) -> Option<Range<usize>> {
    if let Some(cached) = slot.as_ref().filter(|c| c.covers(from)) {
        return cached.found.clone();
    }
    let found = pattern.find_at(text, from).map(|m| m.range());
    *slot = Some(Cached {
        from,
        found: found.clone(),
    });
    found
}

/// Looks ahead from `from`, the offset just past the open tag.
///
/// - No close tag ahead: possibly-single tags are single; other tags own
///   the rest of the input.
/// - A close tag ahead: a possibly-single tag is single if another open
///   tag of the same name comes before it. Otherwise the tag owns the text
///   up to it.
pub(crate) fn resolve<'r, 't>(
    tag: &'r RegisteredTag,
    text: &'t str,
    from: usize,
    lookahead: &mut Lookahead<'r>,
) -> Resolution<'t> {
    let possible_single = tag.options().contains(TagOptions::POSSIBLE_SINGLE);

    match lookahead.next_close(tag, text, from) {
        None if possible_single => Resolution::Single,
        None => Resolution::Body {
            text: &text[from..],
            end: text.len(),
        },
        Some(close) => {
            let reopened = possible_single
                && lookahead
                    .next_open(tag, text, from)
                    .is_some_and(|open| open.start < close.start);
            if reopened {
                Resolution::Single
            } else {
                Resolution::Body {
                    text: &text[from..close.start],
                    end: close.end,
                }
            }
        }
    }
}
