//! Projecting character offsets onto the tree.
//!
//! The highlighter fragments the source text across many nested text leaves. The
//! locator walks those leaves in document order with a running offset and reports,
//! for one annotation, every leaf its range overlaps.

use std::ops::{ControlFlow, Range};

use crate::annotation::Annotation;
use crate::tree::{Node, Root};

/// A splice target: a node addressed by its path from the root, and a range over
/// its content.
///
/// When the path ends at a text leaf the range counts characters of its value;
/// otherwise it counts children of the element (or of the root, for the empty
/// path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub path: Vec<usize>,
    pub range: Range<usize>,
}

impl Match {
    pub fn new(path: Vec<usize>, range: Range<usize>) -> Self {
        Self { path, range }
    }
}

/// Every text leaf overlapped by `annotation`, in document order.
pub fn find_matches(root: &Root, annotation: &Annotation) -> Vec<Match> {
    let mut finder = Finder {
        span: annotation.span(),
        offset: 0,
        path: Vec::new(),
        matches: Vec::new(),
    };
    let _ = finder.visit(&root.children);
    finder.matches
}

struct Finder {
    span: Range<usize>,
    /// Start of the next leaf in the block's linear text.
    offset: usize,
    path: Vec<usize>,
    matches: Vec<Match>,
}

impl Finder {
    fn visit(&mut self, children: &[Node]) -> ControlFlow<()> {
        for (index, child) in children.iter().enumerate() {
            self.path.push(index);
            let flow = match child {
                Node::Text(value) => self.visit_text(value),
                Node::Element(element) => self.visit(&element.children),
            };
            self.path.pop();
            flow?;
        }
        ControlFlow::Continue(())
    }

    fn visit_text(&mut self, value: &str) -> ControlFlow<()> {
        let len = value.chars().count();
        let start = self.offset;
        let end = start + len;

        if self.span.start < end && self.span.end > start {
            let local = self.span.start.saturating_sub(start)..(self.span.end - start).min(len);
            tracing::trace!(path = ?self.path, ?local, "leaf overlaps annotation");
            self.matches.push(Match::new(self.path.clone(), local));
        }

        // Leaves come in document order, nothing later can overlap.
        if end > self.span.end {
            return ControlFlow::Break(());
        }

        self.offset = end;
        ControlFlow::Continue(())
    }
}
