//! The stack of open tags.

use crate::registry::RegisteredTag;

/// An open tag waiting for its close tag.
#[derive(Clone, Copy)]
pub(crate) struct Frame<'r> {
    pub tag: &'r RegisteredTag,
    /// The name as it appeared in the input.
    pub name: &'r str,
}

impl std::fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Frame").field(&self.name).finish()
    }
}

#[derive(Debug)]
pub(crate) struct TagStack<'r> {
    frames: Vec<Frame<'r>>,
}

impl<'r> TagStack<'r> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, frame: Frame<'r>) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame<'r>> {
        self.frames.pop()
    }

    /// The innermost open frame.
    pub fn peek(&self) -> Option<Frame<'r>> {
        self.frames.last().copied()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Distance from the top to the nearest frame named `name`.
    ///
    /// `Some(0)` means the top frame matches.
    pub fn depth_of(&self, name: &str) -> Option<usize> {
        self.frames
            .iter()
            .rev()
            .position(|frame| frame.tag.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::TagDefinition;
    use crate::registry::TagRegistry;

    fn registry() -> TagRegistry {
        TagRegistry::from_definitions(["b", "i", "u"].map(TagDefinition::new)).unwrap()
    }

    fn frame<'r>(reg: &'r TagRegistry, name: &str) -> Frame<'r> {
        let tag = reg.tag(name).unwrap();
        Frame {
            tag,
            name: tag.name(),
        }
    }

    #[test]
    fn push_pop_lifo() {
        let reg = registry();
        let mut stack = TagStack::new();
        stack.push(frame(&reg, "b"));
        stack.push(frame(&reg, "i"));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek().map(|f| f.name), Some("i"));
        assert_eq!(stack.pop().map(|f| f.name), Some("i"));
        assert_eq!(stack.pop().map(|f| f.name), Some("b"));
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn depth_counts_from_top() {
        let reg = registry();
        let mut stack = TagStack::new();
        for name in ["b", "i", "u"] {
            stack.push(frame(&reg, name));
        }
        assert_eq!(stack.depth_of("u"), Some(0));
        assert_eq!(stack.depth_of("b"), Some(2));
        assert_eq!(stack.depth_of("s"), None);
    }

    #[test]
    fn depth_finds_nearest_duplicate() {
        let reg = registry();
        let mut stack = TagStack::new();
        for name in ["b", "i", "b", "u"] {
            stack.push(frame(&reg, name));
        }
        assert_eq!(stack.depth_of("b"), Some(1));
    }
}
