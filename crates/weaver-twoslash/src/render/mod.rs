//! Per-kind rendering of annotations.
//!
//! The splicer hands a render function the annotation and the matched content
//! (`between`); the function returns what replaces that content inline and,
//! optionally, nodes for the footer after the code block. Popover-style
//! renderers pair the two with an identifier minted from [`State`].

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::annotation::{Annotation, AnnotationKind};
use crate::error::{AnnotateError, RenderFailure};
use crate::highlight::Highlight;
use crate::tree::Node;

mod docs;
mod popover;

pub use docs::{highlight_code_blocks, markdown_to_nodes};
pub use popover::{completion, error, highlight, hover, query};

/// Most completion candidates listed before the list is cut off.
pub const MAX_COMPLETIONS: usize = 10;

/// Output of a render function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Replaces the matched content in place.
    pub content: Option<Vec<Node>>,
    /// Appended to the block's footer.
    pub footer: Option<Vec<Node>>,
}

impl RenderResult {
    pub fn new(content: Vec<Node>, footer: Vec<Node>) -> Self {
        Self {
            content: Some(content),
            footer: Some(footer),
        }
    }
}

impl From<Vec<Node>> for RenderResult {
    fn from(content: Vec<Node>) -> Self {
        Self {
            content: Some(content),
            footer: None,
        }
    }
}

pub type RenderFn = Arc<
    dyn Fn(&mut State, &Annotation, Vec<Node>) -> Result<RenderResult, RenderFailure>
        + Send
        + Sync,
>;

/// Wrap a closure as a [`RenderFn`].
pub fn render_fn<F>(f: F) -> RenderFn
where
    F: Fn(&mut State, &Annotation, Vec<Node>) -> Result<RenderResult, RenderFailure>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Render function for every renderable kind.
///
/// Replace a field to override that kind; the others keep their defaults.
#[derive(Clone)]
pub struct Renderers {
    pub completion: RenderFn,
    pub error: RenderFn,
    pub highlight: RenderFn,
    pub hover: RenderFn,
    pub query: RenderFn,
}

impl Renderers {
    pub fn get(&self, kind: AnnotationKind) -> Option<&RenderFn> {
        match kind {
            AnnotationKind::Completion => Some(&self.completion),
            AnnotationKind::Error => Some(&self.error),
            AnnotationKind::Highlight => Some(&self.highlight),
            AnnotationKind::Hover => Some(&self.hover),
            AnnotationKind::Query => Some(&self.query),
            AnnotationKind::Tag => None,
        }
    }
}

impl Default for Renderers {
    fn default() -> Self {
        Self {
            completion: render_fn(completion),
            error: render_fn(error),
            highlight: render_fn(highlight),
            hover: render_fn(hover),
            query: render_fn(query),
        }
    }
}

impl fmt::Debug for Renderers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderers").finish_non_exhaustive()
    }
}

/// Everything render functions share while one code block is annotated.
pub struct State {
    /// Identifiers minted so far in this block.
    pub count: u32,
    /// Prefix of every identifier minted for this block.
    pub id_prefix: String,
    pub renderers: Renderers,
    pub highlighter: Arc<dyn Highlight>,
    /// Language flag used to highlight hover and query signatures.
    pub code_language: SmolStr,
}

impl State {
    pub fn new(id_prefix: impl Into<String>, highlighter: Arc<dyn Highlight>) -> Self {
        Self {
            count: 0,
            id_prefix: id_prefix.into(),
            renderers: Renderers::default(),
            highlighter,
            code_language: SmolStr::new_static("ts"),
        }
    }

    pub fn with_renderers(mut self, renderers: Renderers) -> Self {
        self.renderers = renderers;
        self
    }

    pub fn with_code_language(mut self, flag: impl Into<SmolStr>) -> Self {
        self.code_language = flag.into();
        self
    }

    /// Next identifier: the prefix followed by a counter starting at 0.
    pub fn mint_id(&mut self) -> String {
        let id = format!("{}{}", self.id_prefix, self.count);
        self.count += 1;
        id
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("count", &self.count)
            .field("id_prefix", &self.id_prefix)
            .field("code_language", &self.code_language)
            .finish_non_exhaustive()
    }
}

/// Render `annotation` with the function registered for its kind.
///
/// Fails for `tag` annotations, which have no renderer.
pub fn dispatch(
    state: &mut State,
    annotation: &Annotation,
    between: Vec<Node>,
) -> Result<RenderResult, AnnotateError> {
    let kind = annotation.kind();
    let render = state
        .renderers
        .get(kind)
        .cloned()
        .ok_or(AnnotateError::UnsupportedKind { kind })?;

    render(state, annotation, between).map_err(|source| AnnotateError::Render {
        kind,
        start: annotation.start,
        source,
    })
}
