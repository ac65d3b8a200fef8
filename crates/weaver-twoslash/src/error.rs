use miette::Diagnostic;
use thiserror::Error;

use crate::annotation::AnnotationKind;

/// Error returned by a render function.
pub type RenderFailure = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error, Diagnostic)]
pub enum AnnotateError {
    #[error("no renderer for `{kind}` annotations")]
    #[diagnostic(
        code(twoslash::render::unsupported_kind),
        help("`tag` annotations carry metadata and are never rendered; filter them out first")
    )]
    UnsupportedKind { kind: AnnotationKind },

    #[error("failed to render {kind} annotation at offset {start}")]
    #[diagnostic(code(twoslash::render::failed))]
    Render {
        kind: AnnotationKind,
        start: usize,
        #[source]
        source: RenderFailure,
    },

    #[error("match path {path:?} does not resolve in the tree")]
    #[diagnostic(code(twoslash::splice::stale_match))]
    StaleMatch { path: Vec<usize> },
}
