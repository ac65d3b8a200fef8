//! Page-level entry point.
//!
//! An [`Annotator`] lives for one page: it owns the render table, the highlighter and
//! the shingle counts that keep identifiers unique across the page's code blocks.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::annotation::{Annotation, AnnotationKind};
use crate::error::AnnotateError;
use crate::highlight::Highlight;
use crate::render::{Renderers, State};
use crate::shingle::{ShingleCounts, small_shingle_hash};
use crate::splice::annotate_all;
use crate::tree::{Element, Node, Root};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateOptions {
    /// Prepended to every popover identifier.
    pub id_prefix: SmolStr,
    /// Language flag used to highlight hover and query signatures.
    pub code_language: SmolStr,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            id_prefix: SmolStr::new_static("twoslash-"),
            code_language: SmolStr::new_static("ts"),
        }
    }
}

/// A highlighted block with its annotations applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedBlock {
    pub content: Vec<Node>,
    pub footer: Vec<Node>,
}

impl AnnotatedBlock {
    /// `div.highlight > pre > code`, followed by the footer inside the `div`.
    pub fn into_element(self, language: &str) -> Element {
        let code = Element::new("code")
            .with_class([format!("language-{language}")])
            .with_children(self.content);
        let pre = Element::new("pre").with_children(vec![code.into()]);

        let mut children = Vec::with_capacity(self.footer.len() + 1);
        children.push(pre.into());
        children.extend(self.footer);

        Element::new("div")
            .with_class([
                SmolStr::new_static("highlight"),
                SmolStr::from(format!("highlight-{language}")),
            ])
            .with_children(children)
    }
}

pub struct Annotator {
    options: AnnotateOptions,
    renderers: Renderers,
    highlighter: Arc<dyn Highlight>,
    shingles: ShingleCounts,
}

impl Annotator {
    pub fn new(options: AnnotateOptions) -> Self {
        Self {
            options,
            renderers: Renderers::default(),
            highlighter: default_highlighter(),
            shingles: ShingleCounts::new(),
        }
    }

    pub fn with_renderers(mut self, renderers: Renderers) -> Self {
        self.renderers = renderers;
        self
    }

    pub fn with_highlighter(mut self, highlighter: Arc<dyn Highlight>) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn options(&self) -> &AnnotateOptions {
        &self.options
    }

    pub fn highlighter(&self) -> &Arc<dyn Highlight> {
        &self.highlighter
    }

    /// Apply `annotations` to an already highlighted block, returning the footer.
    ///
    /// `tag` annotations are metadata and are skipped.
    #[tracing::instrument(skip_all, fields(annotations = annotations.len()))]
    pub fn annotate_block(
        &mut self,
        root: &mut Root,
        annotations: &[Annotation],
    ) -> Result<Vec<Node>, AnnotateError> {
        let renderable: Vec<Annotation> = annotations
            .iter()
            .filter(|annotation| annotation.kind() != AnnotationKind::Tag)
            .cloned()
            .collect();
        let skipped = annotations.len() - renderable.len();
        if skipped > 0 {
            tracing::debug!(skipped, "ignoring tag annotations");
        }

        let shingle = small_shingle_hash(&root.text_content(), &mut self.shingles);
        let mut state = State::new(
            format!("{}{shingle}-", self.options.id_prefix),
            Arc::clone(&self.highlighter),
        )
        .with_renderers(self.renderers.clone())
        .with_code_language(self.options.code_language.clone());

        annotate_all(root, &renderable, &mut state)
    }

    /// Highlight `code` as `language`, then apply `annotations`.
    pub fn annotate_code(
        &mut self,
        code: &str,
        language: &str,
        annotations: &[Annotation],
    ) -> Result<AnnotatedBlock, AnnotateError> {
        let nodes = match self.highlighter.flag_to_scope(language) {
            Some(scope) => self.highlighter.highlight(code, &scope),
            None => {
                tracing::debug!(language, "no grammar for code block, leaving it plain");
                vec![Node::text(code)]
            }
        };
        let mut root = Root::new(nodes);
        let footer = self.annotate_block(&mut root, annotations)?;
        Ok(AnnotatedBlock {
            content: root.into_children(),
            footer,
        })
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(AnnotateOptions::default())
    }
}

impl fmt::Debug for Annotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotator")
            .field("options", &self.options)
            .field("shingles", &self.shingles.len())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "syntax-highlighting")]
fn default_highlighter() -> Arc<dyn Highlight> {
    Arc::new(crate::highlight::SyntectHighlighter::default())
}

#[cfg(not(feature = "syntax-highlighting"))]
fn default_highlighter() -> Arc<dyn Highlight> {
    Arc::new(crate::highlight::PlainText)
}
