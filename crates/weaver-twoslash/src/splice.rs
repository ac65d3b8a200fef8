//! Replacing located content with rendered markup.
//!
//! Matches of one annotation are spliced last to first, so the paths and indices of
//! the earlier ones stay valid while the later ones change the tree. A failed render
//! rolls the tree back, so no inline target is left without its footer.

use crate::annotation::Annotation;
use crate::error::AnnotateError;
use crate::locate::{Match, find_matches};
use crate::normalize::normalize_matches;
use crate::render::{State, dispatch};
use crate::tree::{Node, Root, char_to_byte};

/// Apply one annotation to `root`, returning its footer nodes.
///
/// An annotation that overlaps no text is dropped. Each rendered footer is
/// preceded by a newline text node. On error `root` is left as it was.
pub fn annotate(
    root: &mut Root,
    annotation: &Annotation,
    state: &mut State,
) -> Result<Vec<Node>, AnnotateError> {
    rollback_on_error(root, state, |root, state| annotate_in_place(root, annotation, state))
}

/// Apply every annotation in document order, relocating each against the tree as
/// the previous ones left it.
///
/// Identifiers are minted top to bottom; the footer comes out in reverse document
/// order. On error `root` is left as it was and no footer is returned.
pub fn annotate_all(
    root: &mut Root,
    annotations: &[Annotation],
    state: &mut State,
) -> Result<Vec<Node>, AnnotateError> {
    let mut ordered: Vec<&Annotation> = annotations.iter().collect();
    ordered.sort_by_key(|annotation| annotation.start);

    rollback_on_error(root, state, |root, state| {
        let mut footers = Vec::with_capacity(ordered.len());
        for annotation in ordered {
            footers.push(annotate_in_place(root, annotation, state)?);
        }
        Ok(footers.into_iter().rev().flatten().collect())
    })
}

fn rollback_on_error<F>(
    root: &mut Root,
    state: &mut State,
    apply: F,
) -> Result<Vec<Node>, AnnotateError>
where
    F: FnOnce(&mut Root, &mut State) -> Result<Vec<Node>, AnnotateError>,
{
    let snapshot = root.clone();
    let count = state.count;
    let result = apply(root, state);
    if result.is_err() {
        *root = snapshot;
        state.count = count;
    }
    result
}

fn annotate_in_place(
    root: &mut Root,
    annotation: &Annotation,
    state: &mut State,
) -> Result<Vec<Node>, AnnotateError> {
    let matches = normalize_matches(root, find_matches(root, annotation));
    if matches.is_empty() {
        tracing::debug!(
            kind = %annotation.kind(),
            start = annotation.start,
            length = annotation.length,
            "annotation overlaps no text, skipping"
        );
        return Ok(Vec::new());
    }

    let mut footer = Vec::new();
    for target in matches.iter().rev() {
        splice(root, target, annotation, state, &mut footer)?;
    }
    Ok(footer)
}

fn splice(
    root: &mut Root,
    target: &Match,
    annotation: &Annotation,
    state: &mut State,
    footer: &mut Vec<Node>,
) -> Result<(), AnnotateError> {
    let stale = || AnnotateError::StaleMatch {
        path: target.path.clone(),
    };

    if let Some(Node::Text(value)) = root.node(&target.path) {
        let value = value.clone();
        let Some((&index, parent)) = target.path.split_last() else {
            return Err(stale());
        };
        if target.range.start > target.range.end || target.range.end > value.chars().count() {
            return Err(stale());
        }

        let start = char_to_byte(&value, target.range.start);
        let end = char_to_byte(&value, target.range.end);
        let between = vec![Node::text(&value[start..end])];
        let rendered = dispatch(state, annotation, between)?;

        let mut replacement = Vec::with_capacity(3);
        if start != 0 {
            replacement.push(Node::text(&value[..start]));
        }
        replacement.extend(rendered.content.unwrap_or_default());
        if end != value.len() {
            replacement.push(Node::text(&value[end..]));
        }

        let siblings = root.children_mut(parent).ok_or_else(stale)?;
        siblings.splice(index..index + 1, replacement);
        push_footer(footer, rendered.footer);
        return Ok(());
    }

    let children = root.children(&target.path).ok_or_else(stale)?;
    let between = children
        .get(target.range.clone())
        .ok_or_else(stale)?
        .to_vec();
    let rendered = dispatch(state, annotation, between)?;

    let children = root.children_mut(&target.path).ok_or_else(stale)?;
    children.splice(target.range.clone(), rendered.content.unwrap_or_default());
    push_footer(footer, rendered.footer);
    Ok(())
}

fn push_footer(footer: &mut Vec<Node>, rendered: Option<Vec<Node>>) {
    if let Some(nodes) = rendered {
        footer.push(Node::text("\n"));
        footer.extend(nodes);
    }
}
