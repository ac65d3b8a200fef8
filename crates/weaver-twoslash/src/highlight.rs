//! Syntax highlighting into tree nodes.
//!
//! Render functions highlight popover signatures and fenced code in documentation
//! through the [`Highlight`] trait. Languages are looked up in two steps, mirroring
//! how grammars are registered: a flag such as `ts` resolves to a scope name, and
//! the scope picks the grammar.

use smol_str::SmolStr;

use crate::tree::Node;

pub trait Highlight: Send + Sync {
    /// Scope name of the grammar registered for a language flag, if any.
    fn flag_to_scope(&self, flag: &str) -> Option<SmolStr>;

    /// Highlight `code` with the grammar for `scope`. The text content of the
    /// returned nodes must equal `code`.
    fn highlight(&self, code: &str, scope: &str) -> Vec<Node>;
}

/// Knows no languages; everything stays plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl Highlight for PlainText {
    fn flag_to_scope(&self, _flag: &str) -> Option<SmolStr> {
        None
    }

    fn highlight(&self, code: &str, _scope: &str) -> Vec<Node> {
        vec![Node::text(code)]
    }
}

#[cfg(feature = "syntax-highlighting")]
pub use syntect_impl::SyntectHighlighter;

#[cfg(feature = "syntax-highlighting")]
mod syntect_impl {
    use std::sync::Arc;

    use smol_str::SmolStr;
    use syntect::parsing::{
        BasicScopeStackOp, ParseState, ParsingError, Scope, ScopeStack, SyntaxReference,
        SyntaxSet,
    };
    use syntect::util::LinesWithEndings;

    use super::Highlight;
    use crate::tree::{Element, Node};

    /// Flags without a grammar in syntect's default set, mapped to the closest one.
    const FLAG_ALIASES: &[(&str, &str)] = &[
        ("ts", "js"),
        ("tsx", "js"),
        ("mts", "js"),
        ("cts", "js"),
        ("typescript", "js"),
        ("jsx", "js"),
        ("mjs", "js"),
        ("cjs", "js"),
        ("javascript", "js"),
        ("jsonc", "json"),
    ];

    #[derive(Debug, thiserror::Error)]
    enum HighlightError {
        #[error("parsing failed: {0}")]
        Parsing(#[from] ParsingError),
        #[error("unbalanced scope stack: {0}")]
        Scope(String),
    }

    /// Highlighter backed by syntect grammars.
    ///
    /// Each scope becomes a `span` whose classes are the scope's atoms, so
    /// `keyword.operator.js` turns into `class="keyword operator js"`.
    #[derive(Debug, Clone)]
    pub struct SyntectHighlighter {
        syntax_set: Arc<SyntaxSet>,
    }

    impl SyntectHighlighter {
        pub fn new(syntax_set: Arc<SyntaxSet>) -> Self {
            Self { syntax_set }
        }

        pub fn syntax_set(&self) -> &SyntaxSet {
            &self.syntax_set
        }

        fn find_syntax(&self, flag: &str) -> Option<&SyntaxReference> {
            let lower = flag.to_ascii_lowercase();
            self.syntax_set.find_syntax_by_token(&lower).or_else(|| {
                FLAG_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == lower)
                    .and_then(|(_, token)| self.syntax_set.find_syntax_by_token(token))
            })
        }

        fn build(&self, code: &str, syntax: &SyntaxReference) -> Result<Vec<Node>, HighlightError> {
            let mut parse_state = ParseState::new(syntax);
            let mut scope_stack = ScopeStack::new();
            let mut builder = TreeBuilder::default();

            for line in LinesWithEndings::from(code) {
                let ops = parse_state.parse_line(line, &self.syntax_set)?;
                let mut cursor = 0;
                for (offset, op) in ops {
                    builder.text(&line[cursor..offset]);
                    cursor = offset;
                    scope_stack
                        .apply_with_hook(&op, |basic, _| match basic {
                            BasicScopeStackOp::Push(scope) => builder.open(scope),
                            BasicScopeStackOp::Pop => builder.close(),
                        })
                        .map_err(|e| HighlightError::Scope(format!("{e:?}")))?;
                }
                builder.text(&line[cursor..]);
            }

            Ok(builder.finish())
        }
    }

    impl Default for SyntectHighlighter {
        fn default() -> Self {
            Self::new(Arc::new(SyntaxSet::load_defaults_newlines()))
        }
    }

    impl Highlight for SyntectHighlighter {
        fn flag_to_scope(&self, flag: &str) -> Option<SmolStr> {
            self.find_syntax(flag)
                .map(|syntax| SmolStr::from(syntax.scope.build_string()))
        }

        fn highlight(&self, code: &str, scope: &str) -> Vec<Node> {
            let syntax = Scope::new(scope)
                .ok()
                .and_then(|scope| self.syntax_set.find_syntax_by_scope(scope));
            let Some(syntax) = syntax else {
                tracing::debug!(scope, "no grammar for scope, leaving code plain");
                return vec![Node::text(code)];
            };

            match self.build(code, syntax) {
                Ok(nodes) => nodes,
                Err(e) => {
                    tracing::warn!(scope, "failed to highlight code: {e}");
                    vec![Node::text(code)]
                }
            }
        }
    }

    /// Stack of open scope spans.
    #[derive(Default)]
    struct TreeBuilder {
        open: Vec<Element>,
        done: Vec<Node>,
    }

    impl TreeBuilder {
        fn open(&mut self, scope: Scope) {
            let name = scope.build_string();
            self.open
                .push(Element::new("span").with_class(name.split('.').map(SmolStr::new)));
        }

        fn close(&mut self) {
            if let Some(element) = self.open.pop() {
                if !element.children.is_empty() {
                    self.append(element.into());
                }
            }
        }

        fn text(&mut self, value: &str) {
            if value.is_empty() {
                return;
            }
            let children = match self.open.last_mut() {
                Some(element) => &mut element.children,
                None => &mut self.done,
            };
            match children.last_mut() {
                Some(Node::Text(previous)) => previous.push_str(value),
                _ => children.push(Node::text(value)),
            }
        }

        fn append(&mut self, node: Node) {
            match self.open.last_mut() {
                Some(element) => element.children.push(node),
                None => self.done.push(node),
            }
        }

        fn finish(mut self) -> Vec<Node> {
            while !self.open.is_empty() {
                self.close();
            }
            self.done
        }
    }

}
