//! Fixtures and markup helpers shared by the unit tests.

use smol_str::SmolStr;

use crate::highlight::Highlight;
use crate::tree::{Element, Node, PropertyValue, Root};

fn span(class: &str, children: Vec<Node>) -> Node {
    Element::new("span")
        .with_class([class])
        .with_children(children)
        .into()
}

/// `const hi = 'Hello'` the way a highlighter fragments it.
pub(crate) fn const_hi() -> Root {
    Root::new(vec![
        span("pl-k", vec![Node::text("const")]),
        Node::text(" "),
        span("pl-c1", vec![Node::text("hi")]),
        Node::text(" "),
        span("pl-k", vec![Node::text("=")]),
        Node::text(" "),
        span(
            "pl-s",
            vec![
                span("pl-pds", vec![Node::text("'")]),
                Node::text("Hello"),
                span("pl-pds", vec![Node::text("'")]),
            ],
        ),
    ])
}

/// Knows `ts` only, and wraps whatever it highlights in a single `hl` span.
pub(crate) struct FakeHighlighter;

impl Highlight for FakeHighlighter {
    fn flag_to_scope(&self, flag: &str) -> Option<SmolStr> {
        (flag == "ts").then(|| SmolStr::new_static("source.ts"))
    }

    fn highlight(&self, code: &str, _scope: &str) -> Vec<Node> {
        vec![span("hl", vec![Node::text(code)])]
    }
}

/// Compact HTML-like rendering used to assert on tree shape.
pub(crate) fn html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(value) => {
            for c in value.chars() {
                match c {
                    '&' => out.push_str("&amp;"),
                    '<' => out.push_str("&lt;"),
                    '>' => out.push_str("&gt;"),
                    _ => out.push(c),
                }
            }
        }
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.properties {
                match value {
                    PropertyValue::Bool(false) => continue,
                    PropertyValue::Bool(true) => {
                        out.push(' ');
                        out.push_str(name);
                    }
                    PropertyValue::Text(text) => {
                        out.push_str(&format!(" {name}=\"{text}\""));
                    }
                    PropertyValue::List(list) => {
                        out.push_str(&format!(" {name}=\"{}\"", list.join(" ")));
                    }
                }
            }
            out.push('>');
            for child in &element.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}
