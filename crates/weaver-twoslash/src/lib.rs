//! Weaver twoslash
//!
//! Splices twoslash annotations (hovers, queries, errors, completions, highlights)
//! into syntax-highlighted code block trees. Annotations are character ranges over
//! the block's text; the highlighter has already cut that text into nested spans,
//! so each range is located across the leaves, lifted to the coarsest nodes it
//! fully covers, and handed to a per-kind render function. Popovers produced along
//! the way are collected into a footer that follows the block.
//!
//! ```no_run
//! use weaver_twoslash::{Annotation, Annotator};
//!
//! let annotations: Vec<Annotation> = serde_json::from_str(r#"[
//!     {"type": "hover", "start": 6, "length": 2, "text": "const hi: \"Hello\""}
//! ]"#)?;
//! let mut annotator = Annotator::default();
//! let block = annotator.annotate_code("const hi = 'Hello'", "ts", &annotations)?;
//! let element = block.into_element("ts");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod annotation;
pub mod annotator;
pub mod error;
pub mod highlight;
pub mod locate;
pub mod normalize;
pub mod render;
pub mod shingle;
pub mod splice;
pub mod tree;

#[cfg(test)]
pub(crate) mod testing;

pub use annotation::{Annotation, AnnotationKind, Payload};
pub use annotator::{AnnotateOptions, AnnotatedBlock, Annotator};
pub use error::{AnnotateError, RenderFailure};
pub use highlight::{Highlight, PlainText};
#[cfg(feature = "syntax-highlighting")]
pub use highlight::SyntectHighlighter;
pub use render::{RenderFn, RenderResult, Renderers, State, render_fn};
pub use splice::{annotate, annotate_all};
pub use tree::{Element, Node, PropertyValue, Root};
