//! Default renderers.
//!
//! Popover kinds wrap the matched content in a target `span` carrying
//! `data-popover-target`, and put a `div[popover]` with the same `id` in the
//! footer. A renderer that receives a payload for another kind returns the
//! content undecorated.

use smol_str::SmolStr;

use super::docs::create_info;
use super::{MAX_COMPLETIONS, RenderResult, State};
use crate::annotation::{Annotation, Completion, CompletionPayload, InfoPayload, Payload};
use crate::error::RenderFailure;
use crate::tree::{Element, Node};

fn popover_target(id: &str, classes: &[&str], between: Vec<Node>) -> Node {
    Element::new("span")
        .with_class(classes.iter().copied())
        .with_property("data-popover-target", id)
        .with_children(between)
        .into()
}

fn popover(id: &str, classes: &[&str], children: Vec<Node>) -> Node {
    Element::new("div")
        .with_class(classes.iter().copied())
        .with_property("id", id)
        .with_property("popover", "")
        .with_children(children)
        .into()
}

fn span(classes: &[&str], children: Vec<Node>) -> Node {
    Element::new("span")
        .with_class(classes.iter().copied())
        .with_children(children)
        .into()
}

pub fn highlight(
    _state: &mut State,
    _annotation: &Annotation,
    between: Vec<Node>,
) -> Result<RenderResult, RenderFailure> {
    Ok(vec![span(&["twoslash-highlight"], between)].into())
}

pub fn hover(
    state: &mut State,
    annotation: &Annotation,
    between: Vec<Node>,
) -> Result<RenderResult, RenderFailure> {
    let Payload::Hover(info) = &annotation.payload else {
        return Ok(between.into());
    };
    Ok(info_popover(
        state,
        info,
        between,
        &["twoslash-popover-target"],
        &["twoslash-hover", "twoslash-popover"],
    ))
}

pub fn query(
    state: &mut State,
    annotation: &Annotation,
    between: Vec<Node>,
) -> Result<RenderResult, RenderFailure> {
    let Payload::Query(info) = &annotation.payload else {
        return Ok(between.into());
    };
    Ok(info_popover(
        state,
        info,
        between,
        &["twoslash-autoshow", "twoslash-popover-target"],
        &["twoslash-popover", "twoslash-query"],
    ))
}

fn info_popover(
    state: &mut State,
    info: &InfoPayload,
    between: Vec<Node>,
    target_classes: &[&str],
    popover_classes: &[&str],
) -> RenderResult {
    let id = state.mint_id();
    let body = create_info(state, info);
    RenderResult::new(
        vec![popover_target(&id, target_classes, between)],
        vec![popover(&id, popover_classes, body)],
    )
}

pub fn error(
    state: &mut State,
    annotation: &Annotation,
    between: Vec<Node>,
) -> Result<RenderResult, RenderFailure> {
    let Payload::Error(payload) = &annotation.payload else {
        return Ok(between.into());
    };
    let id = state.mint_id();
    let message = match &payload.code {
        Some(code) => format!("{} ({code})", payload.text),
        None => payload.text.clone(),
    };

    let code = Element::new("code").with_children(vec![Node::text(message)]);
    let pre = Element::new("pre")
        .with_class(["twoslash-popover-code"])
        .with_children(vec![code.into()]);

    Ok(RenderResult::new(
        vec![popover_target(
            &id,
            &["twoslash-error-target", "twoslash-popover-target"],
            between,
        )],
        vec![popover(
            &id,
            &["twoslash-error", "twoslash-popover"],
            vec![pre.into()],
        )],
    ))
}

pub fn completion(
    state: &mut State,
    annotation: &Annotation,
    between: Vec<Node>,
) -> Result<RenderResult, RenderFailure> {
    let Payload::Completion(payload) = &annotation.payload else {
        return Ok(between.into());
    };
    let id = state.mint_id();
    let list = Element::new("ol")
        .with_class(["twoslash-completions"])
        .with_children(completion_items(payload));

    Ok(RenderResult::new(
        vec![popover_target(
            &id,
            &[
                "twoslash-autoshow",
                "twoslash-completion-swap",
                "twoslash-popover-target",
            ],
            between,
        )],
        vec![popover(
            &id,
            &["twoslash-completion", "twoslash-popover"],
            vec![list.into()],
        )],
    ))
}

fn completion_items(payload: &CompletionPayload) -> Vec<Node> {
    let mut items: Vec<Node> = payload
        .completions
        .iter()
        .take(MAX_COMPLETIONS)
        .map(|candidate| completion_item(candidate, &payload.completions_prefix))
        .collect();

    if payload.completions.len() > MAX_COMPLETIONS {
        items.push(
            Element::new("li")
                .with_class(["twoslash-completions-more"])
                .with_children(vec![Node::text("…")])
                .into(),
        );
    }

    items
}

fn completion_item(candidate: &Completion, prefix: &str) -> Node {
    let name = candidate.name.as_str();
    let children = match name.strip_prefix(prefix) {
        Some(rest) if !rest.is_empty() => vec![
            span(&["twoslash-match"], vec![Node::text(prefix)]),
            span(&["twoslash-completion-swap"], vec![Node::text(rest)]),
        ],
        _ => vec![span(&["twoslash-completion-swap"], vec![Node::text(name)])],
    };

    let mut classes = vec![SmolStr::new_static("twoslash-completion")];
    if candidate.is_deprecated() {
        classes.push(SmolStr::new_static("twoslash-completion-deprecated"));
    }

    Element::new("li")
        .with_class(classes)
        .with_children(children)
        .into()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::annotation::{ErrorCode, ErrorPayload, HighlightPayload};
    use crate::highlight::PlainText;
    use crate::render::dispatch;
    use crate::testing::html;

    fn state() -> State {
        State::new("twoslash-t-", Arc::new(PlainText))
    }

    fn between() -> Vec<Node> {
        vec![Node::text("hi")]
    }

    #[test]
    fn test_highlight() {
        let annotation = Annotation::new(0, 2, Payload::Highlight(HighlightPayload::default()));
        let result = dispatch(&mut state(), &annotation, between()).unwrap();
        assert!(result.footer.is_none());
        insta::assert_snapshot!(
            html(&result.content.unwrap()),
            @r#"<span class="twoslash-highlight">hi</span>"#
        );
    }

    #[test]
    fn test_hover() {
        let mut state = state();
        let info = InfoPayload::new("const hi: \"Hello\"");
        let annotation = Annotation::new(0, 2, Payload::Hover(info));
        let result = dispatch(&mut state, &annotation, between()).unwrap();

        insta::assert_snapshot!(
            html(&result.content.unwrap()),
            @r#"<span class="twoslash-popover-target" data-popover-target="twoslash-t-0">hi</span>"#
        );
        insta::assert_snapshot!(
            html(&result.footer.unwrap()),
            @r#"<div class="twoslash-hover twoslash-popover" id="twoslash-t-0" popover=""><pre class="twoslash-popover-code"><code class="language-ts">const hi: "Hello"</code></pre></div>"#
        );
    }

    #[test]
    fn test_query_autoshows() {
        let mut state = state();
        let annotation = Annotation::new(0, 2, Payload::Query(InfoPayload::new("string")));
        let result = dispatch(&mut state, &annotation, between()).unwrap();

        let content = result.content.unwrap();
        let target = content[0].as_element().unwrap();
        assert_eq!(target.class_names(), ["twoslash-autoshow", "twoslash-popover-target"]);
        let footer = result.footer.unwrap();
        let popover = footer[0].as_element().unwrap();
        assert_eq!(popover.class_names(), ["twoslash-popover", "twoslash-query"]);
        assert_eq!(popover.property_text("id"), Some("twoslash-t-0"));
    }

    #[test]
    fn test_error_with_code() {
        let annotation = Annotation::new(
            0,
            2,
            Payload::Error(ErrorPayload {
                text: "Cannot find name 'hi'.".into(),
                code: Some(ErrorCode::Number(2304)),
                level: None,
            }),
        );
        let result = dispatch(&mut state(), &annotation, between()).unwrap();

        insta::assert_snapshot!(
            html(&result.content.unwrap()),
            @r#"<span class="twoslash-error-target twoslash-popover-target" data-popover-target="twoslash-t-0">hi</span>"#
        );
        insta::assert_snapshot!(
            html(&result.footer.unwrap()),
            @r#"<div class="twoslash-error twoslash-popover" id="twoslash-t-0" popover=""><pre class="twoslash-popover-code"><code>Cannot find name 'hi'. (2304)</code></pre></div>"#
        );
    }

    #[test]
    fn test_error_without_code() {
        let annotation = Annotation::new(
            0,
            2,
            Payload::Error(ErrorPayload {
                text: "Oops".into(),
                ..Default::default()
            }),
        );
        let result = dispatch(&mut state(), &annotation, between()).unwrap();
        let footer = result.footer.unwrap();
        assert_eq!(footer[0].text_content(), "Oops");
    }

    fn completions(names: &[&str]) -> Annotation {
        Annotation::new(
            0,
            0,
            Payload::Completion(CompletionPayload {
                completions: names.iter().map(|name| Completion::new(*name)).collect(),
                completions_prefix: "con".into(),
            }),
        )
    }

    fn list_items(result: RenderResult) -> Vec<Element> {
        let footer = result.footer.unwrap();
        let popover = footer[0].as_element().unwrap().clone();
        let list = popover.children[0].as_element().unwrap().clone();
        assert_eq!(list.tag, "ol");
        list.children
            .into_iter()
            .filter_map(|node| match node {
                Node::Element(element) => Some(element),
                Node::Text(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_completion_prefix_split() {
        let mut annotation = completions(&["console", "con", "alert"]);
        if let Payload::Completion(payload) = &mut annotation.payload {
            payload.completions[2].kind_modifiers = Some("deprecated,declare".into());
        }
        let result = dispatch(&mut state(), &annotation, between()).unwrap();
        let items = list_items(result);

        insta::assert_snapshot!(
            html(&items.into_iter().map(Node::from).collect::<Vec<_>>()),
            @r#"<li class="twoslash-completion"><span class="twoslash-match">con</span><span class="twoslash-completion-swap">sole</span></li><li class="twoslash-completion"><span class="twoslash-completion-swap">con</span></li><li class="twoslash-completion twoslash-completion-deprecated"><span class="twoslash-completion-swap">alert</span></li>"#
        );
    }

    #[test]
    fn test_completion_truncates() {
        let names: Vec<String> = (0..12).map(|i| format!("const{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let result = dispatch(&mut state(), &completions(&names), between()).unwrap();
        let items = list_items(result);

        assert_eq!(items.len(), 11);
        let last = &items[10];
        assert!(last.has_class("twoslash-completions-more"));
        assert_eq!(last.text_content(), "…");
        assert!(items[..10].iter().all(|item| item.has_class("twoslash-completion")));
    }

    #[test]
    fn test_completion_exactly_ten() {
        let names: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let result = dispatch(&mut state(), &completions(&names), between()).unwrap();
        let items = list_items(result);
        assert_eq!(items.len(), 10);
        assert!(!items[9].has_class("twoslash-completions-more"));
    }

    #[test]
    fn test_mismatched_payload_is_left_alone() {
        let annotation = Annotation::new(0, 2, Payload::Highlight(HighlightPayload::default()));
        let mut state = state();
        let result = hover(&mut state, &annotation, between()).unwrap();
        assert_eq!(result, RenderResult::from(between()));
        assert_eq!(state.count, 0);
    }
}
