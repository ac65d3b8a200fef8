//! Annotations reported by twoslash.
//!
//! Offsets are character offsets into the linear text of one code block. The
//! serde shape follows the JSON nodes twoslash emits: a `type` tag next to `start`
//! and `length`, plus per-kind fields. Extra fields (`line`, `character`,
//! `target`, ...) are ignored.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Closed set of annotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Completion,
    Error,
    Highlight,
    Hover,
    Query,
    /// Custom `// @tag: value` comment. Metadata only; never rendered.
    Tag,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completion => "completion",
            Self::Error => "error",
            Self::Highlight => "highlight",
            Self::Hover => "hover",
            Self::Query => "query",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub start: usize,
    #[serde(default)]
    pub length: usize,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Annotation {
    pub fn new(start: usize, length: usize, payload: Payload) -> Self {
        Self {
            start,
            length,
            payload,
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        match self.payload {
            Payload::Completion(_) => AnnotationKind::Completion,
            Payload::Error(_) => AnnotationKind::Error,
            Payload::Highlight(_) => AnnotationKind::Highlight,
            Payload::Hover(_) => AnnotationKind::Hover,
            Payload::Query(_) => AnnotationKind::Query,
            Payload::Tag(_) => AnnotationKind::Tag,
        }
    }

    /// Character range to locate. Empty annotations still cover one character.
    /// Saturates at `usize::MAX`, where it overlaps nothing.
    pub fn span(&self) -> Range<usize> {
        self.start..self.start.saturating_add(self.length.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    Completion(CompletionPayload),
    Error(ErrorPayload),
    Highlight(HighlightPayload),
    Hover(InfoPayload),
    Query(InfoPayload),
    Tag(TagPayload),
}

/// Hover and query payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoPayload {
    /// Signature text, e.g. `const hi: "Hello"`.
    pub text: String,
    /// Markdown documentation.
    #[serde(default)]
    pub docs: Option<String>,
    /// JSDoc tags as `[name, text]` pairs.
    #[serde(default)]
    pub tags: Vec<(SmolStr, Option<String>)>,
}

impl InfoPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub text: String,
    #[serde(default)]
    pub code: Option<ErrorCode>,
    #[serde(default)]
    pub level: Option<SmolStr>,
}

/// Diagnostic code; the TypeScript service reports numbers, other tools strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(SmolStr),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(code) => write!(f, "{code}"),
            Self::Text(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPayload {
    #[serde(default)]
    pub completions: Vec<Completion>,
    /// Text typed so far at the completion point.
    #[serde(default)]
    pub completions_prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub name: SmolStr,
    #[serde(default)]
    pub kind: Option<SmolStr>,
    /// Comma separated modifiers, e.g. `deprecated,optional`.
    #[serde(default)]
    pub kind_modifiers: Option<SmolStr>,
}

impl Completion {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_deprecated(&self) -> bool {
        self.kind_modifiers
            .as_deref()
            .is_some_and(|modifiers| modifiers.split(',').any(|m| m.trim() == "deprecated"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightPayload {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagPayload {
    pub name: SmolStr,
    #[serde(default)]
    pub text: Option<String>,
}
