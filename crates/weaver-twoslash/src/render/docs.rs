//! Hover and query popover bodies.
//!
//! The body is the highlighted signature, followed by the documentation. The
//! documentation is markdown (GFM) parsed to mdast and mapped onto tree elements,
//! plus a list of `@tag`s. Fenced code inside the documentation is highlighted
//! again with the block's highlighter.

use markdown::ParseOptions;
use markdown::mdast;

use super::State;
use crate::annotation::InfoPayload;
use crate::highlight::Highlight;
use crate::tree::{Element, Node};

const LANGUAGE_CLASS_PREFIX: &str = "language-";

pub(super) fn create_info(state: &State, info: &InfoPayload) -> Vec<Node> {
    let mut description = info
        .docs
        .as_deref()
        .map(markdown_to_nodes)
        .unwrap_or_default();

    let tags: Vec<Node> = info
        .tags
        .iter()
        .map(|(name, text)| tag_item(name, text.as_deref()))
        .collect();
    if !tags.is_empty() {
        description.push(Element::new("ul").with_children(tags).into());
    }

    highlight_code_blocks(&mut description, state.highlighter.as_ref());

    let flag = state.code_language.as_str();
    let signature = match state.highlighter.flag_to_scope(flag) {
        Some(scope) => state.highlighter.highlight(&info.text, &scope),
        None => vec![Node::text(info.text.as_str())],
    };
    let code = Element::new("code")
        .with_class([format!("{LANGUAGE_CLASS_PREFIX}{flag}")])
        .with_children(signature);

    let mut body = vec![
        Element::new("pre")
            .with_class(["twoslash-popover-code"])
            .with_children(vec![code.into()])
            .into(),
    ];
    if !description.is_empty() {
        body.push(
            Element::new("div")
                .with_class(["twoslash-popover-description"])
                .with_children(description)
                .into(),
        );
    }
    body
}

/// `**@name**`, with the tag text on the next line so fenced code still parses.
fn tag_item(name: &str, text: Option<&str>) -> Node {
    let source = match text {
        Some(text) => format!("**@{name}**\n{text}"),
        None => format!("**@{name}**"),
    };
    Element::new("li")
        .with_children(unwrap_paragraphs(markdown_to_nodes(&source)))
        .into()
}

/// Parse GFM markdown into tree nodes. Raw HTML is dropped.
pub fn markdown_to_nodes(value: &str) -> Vec<Node> {
    match markdown::to_mdast(value, &ParseOptions::gfm()) {
        Ok(tree) => convert(&tree),
        Err(e) => {
            tracing::warn!("failed to parse documentation markdown: {e}");
            vec![
                Element::new("p")
                    .with_children(vec![Node::text(value)])
                    .into(),
            ]
        }
    }
}

/// Highlight every `pre > code.language-*` whose language the highlighter knows.
pub fn highlight_code_blocks(nodes: &mut [Node], highlighter: &dyn Highlight) {
    for node in nodes {
        let Node::Element(element) = node else {
            continue;
        };
        if element.tag == "pre" {
            if let Some(Node::Element(code)) = element.children.first_mut() {
                if code.tag == "code" {
                    highlight_code(code, highlighter);
                    continue;
                }
            }
        }
        highlight_code_blocks(&mut element.children, highlighter);
    }
}

fn highlight_code(code: &mut Element, highlighter: &dyn Highlight) {
    let flag = code
        .class_names()
        .iter()
        .find_map(|class| class.strip_prefix(LANGUAGE_CLASS_PREFIX));
    let Some(scope) = flag.and_then(|flag| highlighter.flag_to_scope(flag)) else {
        return;
    };
    let source = code.text_content();
    code.children = highlighter.highlight(&source, &scope);
}

fn convert_all(nodes: &[mdast::Node]) -> Vec<Node> {
    nodes.iter().flat_map(convert).collect()
}

fn convert(node: &mdast::Node) -> Vec<Node> {
    use mdast::Node as Md;

    let element = match node {
        Md::Root(root) => return convert_all(&root.children),
        Md::Text(text) => return vec![Node::text(text.value.as_str())],
        Md::Html(_) => return Vec::new(),
        Md::Code(code) => return vec![code_block(code)],
        Md::List(list) => return vec![list_element(list)],
        Md::Paragraph(paragraph) => {
            Element::new("p").with_children(convert_all(&paragraph.children))
        }
        Md::Heading(heading) => Element::new(format!("h{}", heading.depth))
            .with_children(convert_all(&heading.children)),
        Md::Strong(strong) => Element::new("strong").with_children(convert_all(&strong.children)),
        Md::Emphasis(emphasis) => {
            Element::new("em").with_children(convert_all(&emphasis.children))
        }
        Md::Delete(delete) => Element::new("del").with_children(convert_all(&delete.children)),
        Md::Blockquote(quote) => {
            Element::new("blockquote").with_children(convert_all(&quote.children))
        }
        Md::InlineCode(code) => {
            Element::new("code").with_children(vec![Node::text(code.value.as_str())])
        }
        Md::Link(link) => {
            let mut a = Element::new("a").with_property("href", link.url.as_str());
            if let Some(title) = &link.title {
                a = a.with_property("title", title.as_str());
            }
            a.with_children(convert_all(&link.children))
        }
        Md::Image(image) => {
            let mut img = Element::new("img")
                .with_property("src", image.url.as_str())
                .with_property("alt", image.alt.as_str());
            if let Some(title) = &image.title {
                img = img.with_property("title", title.as_str());
            }
            img
        }
        Md::ListItem(item) => list_item(item, false),
        Md::Break(_) => Element::new("br"),
        Md::ThematicBreak(_) => Element::new("hr"),
        Md::Table(table) => table_element(table),
        other => {
            return other
                .children()
                .map(|children| convert_all(children))
                .unwrap_or_default();
        }
    };
    vec![element.into()]
}

fn code_block(code: &mdast::Code) -> Node {
    let mut element = Element::new("code");
    if let Some(lang) = &code.lang {
        element = element.with_class([format!("{LANGUAGE_CLASS_PREFIX}{lang}")]);
    }
    let value = if code.value.is_empty() {
        String::new()
    } else {
        format!("{}\n", code.value)
    };
    Element::new("pre")
        .with_children(vec![element.with_children(vec![Node::text(value)]).into()])
        .into()
}

fn list_element(list: &mdast::List) -> Node {
    let loose = list.spread
        || list
            .children
            .iter()
            .any(|child| matches!(child, mdast::Node::ListItem(item) if item.spread));

    let mut element = Element::new(if list.ordered { "ol" } else { "ul" });
    if let Some(start) = list.start.filter(|start| list.ordered && *start != 1) {
        element = element.with_property("start", start.to_string());
    }

    let items = list
        .children
        .iter()
        .map(|child| match child {
            mdast::Node::ListItem(item) => list_item(item, !loose).into(),
            other => Element::new("li").with_children(convert(other)).into(),
        })
        .collect();
    element.with_children(items).into()
}

/// Tight list items hold their paragraphs' content directly.
fn list_item(item: &mdast::ListItem, tight: bool) -> Element {
    let children = convert_all(&item.children);
    Element::new("li").with_children(if tight {
        unwrap_paragraphs(children)
    } else {
        children
    })
}

fn unwrap_paragraphs(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .flat_map(|node| match node {
            Node::Element(element) if element.tag == "p" => element.children,
            other => vec![other],
        })
        .collect()
}

fn table_element(table: &mdast::Table) -> Element {
    let rows = table
        .children
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let cell_tag = if index == 0 { "th" } else { "td" };
            let cells = row
                .children()
                .map(|cells| {
                    cells
                        .iter()
                        .map(|cell| {
                            let content = cell
                                .children()
                                .map(|children| convert_all(children))
                                .unwrap_or_default();
                            Element::new(cell_tag).with_children(content).into()
                        })
                        .collect()
                })
                .unwrap_or_default();
            Element::new("tr").with_children(cells).into()
        })
        .collect();
    Element::new("table").with_children(rows)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::highlight::PlainText;
    use crate::testing::{FakeHighlighter, html};

    #[test]
    fn test_inline_markdown() {
        let nodes = markdown_to_nodes("Hello **world**, see `x` and [docs](https://example.com).");
        insta::assert_snapshot!(
            html(&nodes),
            @r#"<p>Hello <strong>world</strong>, see <code>x</code> and <a href="https://example.com">docs</a>.</p>"#
        );
    }

    #[test]
    fn test_tight_list() {
        let nodes = markdown_to_nodes("- a\n- b");
        insta::assert_snapshot!(html(&nodes), @"<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_raw_html_dropped() {
        let nodes = markdown_to_nodes("<script>alert(1)</script>");
        assert_eq!(Element::new("div").with_children(nodes).text_content(), "");
    }

    #[test]
    fn test_fenced_code_highlighted() {
        let mut nodes = markdown_to_nodes("```ts\nlet a = 1\n```");
        assert_eq!(
            html(&nodes),
            "<pre><code class=\"language-ts\">let a = 1\n</code></pre>"
        );

        highlight_code_blocks(&mut nodes, &FakeHighlighter);
        let pre = nodes[0].as_element().unwrap();
        let code = pre.children[0].as_element().unwrap();
        let span = code.children[0].as_element().unwrap();
        assert!(span.has_class("hl"));
        assert_eq!(code.text_content(), "let a = 1\n");
    }

    #[test]
    fn test_unknown_language_left_plain() {
        let mut nodes = markdown_to_nodes("```klingon\nQapla'\n```\n\n```\nplain\n```");
        let before = nodes.clone();
        highlight_code_blocks(&mut nodes, &FakeHighlighter);
        assert_eq!(nodes, before);
    }

    #[test]
    fn test_info_with_docs_and_tags() {
        let state = State::new("p-", Arc::new(FakeHighlighter));
        let info = InfoPayload {
            text: "function f(x: number): void".into(),
            docs: Some("Does *things*.".into()),
            tags: vec![
                ("param".into(), Some("x the value".into())),
                ("deprecated".into(), None),
            ],
        };
        let body = create_info(&state, &info);
        assert_eq!(body.len(), 2);

        let pre = body[0].as_element().unwrap();
        assert!(pre.has_class("twoslash-popover-code"));
        let code = pre.children[0].as_element().unwrap();
        assert!(code.has_class("language-ts"));
        assert!(code.children[0].as_element().unwrap().has_class("hl"));
        assert_eq!(code.text_content(), "function f(x: number): void");

        let description = body[1].as_element().unwrap();
        assert!(description.has_class("twoslash-popover-description"));
        insta::assert_snapshot!(
            html(&description.children[..1]),
            @"<p>Does <em>things</em>.</p>"
        );

        let list = description.children[1].as_element().unwrap();
        assert_eq!(list.tag, "ul");
        assert_eq!(list.children.len(), 2);
        let param = list.children[0].as_element().unwrap();
        let label = param.children[0].as_element().unwrap();
        assert_eq!(label.tag, "strong");
        assert_eq!(label.text_content(), "@param");
        assert!(param.text_content().ends_with("x the value"));
        insta::assert_snapshot!(
            html(&list.children[1..]),
            @"<li><strong>@deprecated</strong></li>"
        );
    }

    #[test]
    fn test_info_without_docs() {
        let state = State::new("p-", Arc::new(PlainText)).with_code_language("js");
        let body = create_info(&state, &InfoPayload::new("let x: number"));
        insta::assert_snapshot!(
            html(&body),
            @r#"<pre class="twoslash-popover-code"><code class="language-js">let x: number</code></pre>"#
        );
    }
}
