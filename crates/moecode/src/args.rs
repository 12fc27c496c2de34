//! Captured tag arguments.
//!
//! Every open tag gets a fresh [`Arguments`] list. Slot 0 holds the explicit
//! `=value` (or the body, for tags that allow it) and slot 1 holds the body
//! of tags that take their body as an argument. Argument transforms may push
//! more slots under their own names.
//!
//! Values are stored HTML-escaped: they are cut from input that was escaped
//! before scanning, so they can be spliced into attributes as-is.

use std::collections::HashMap;

/// Index of the explicit `=value` argument.
pub const ARG_INDEX: usize = 0;

/// Index of the body argument.
pub const BODY_INDEX: usize = 1;

/// Ordered argument list, addressable by position and by name.
///
/// Lookups never fail: missing positions and unknown names give `""`.
///
/// ```rust
/// use moecode::Arguments;
///
/// let mut args = Arguments::new();
/// args.set(0, "http://example.com");
/// assert_eq!(args.get(0), "http://example.com");
/// assert_eq!(args.by_name("arg"), "http://example.com");
/// assert_eq!(args.get(7), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arguments {
    values: Vec<String>,
    names: HashMap<String, usize>,
}

impl Arguments {
    /// Creates the two standard slots, `arg` and `body`, both empty.
    pub fn new() -> Self {
        let mut names = HashMap::new();
        names.insert("arg".to_string(), ARG_INDEX);
        names.insert("body".to_string(), BODY_INDEX);
        Self {
            values: vec![String::new(), String::new()],
            names,
        }
    }

    /// Returns the argument at `index`, or `""` when out of range.
    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    /// Returns the argument registered under `name`, or `""`.
    pub fn by_name(&self, name: &str) -> &str {
        self.names
            .get(name)
            .map(|&index| self.get(index))
            .unwrap_or("")
    }

    /// Sets the argument at `index`, growing the list with empty slots.
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if index >= self.values.len() {
            self.values.resize(index + 1, String::new());
        }
        self.values[index] = value.into();
    }

    /// Sets the argument registered under `name`, adding a slot if needed.
    pub fn set_named(&mut self, name: &str, value: impl Into<String>) {
        match self.names.get(name) {
            Some(&index) => self.set(index, value),
            None => {
                self.push_named(name, value);
            }
        }
    }

    /// Appends a new argument under `name` and returns its index.
    ///
    /// A name pushed twice points at the newer slot.
    pub fn push_named(&mut self, name: &str, value: impl Into<String>) -> usize {
        let index = self.values.len();
        self.values.push(value.into());
        self.names.insert(name.to_string(), index);
        index
    }

    /// Number of slots, including empty ones.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no slots at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all slots in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::new()
    }
}
