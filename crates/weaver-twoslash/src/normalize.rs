//! Coarsening leaf matches into splice targets.
//!
//! A match that fills a node from its first position to its last is lifted to
//! "this one child slot of the parent", repeatedly, so a render function gets the
//! highlighter's wrapper elements instead of bare text. Consecutive matches on the
//! same node are then joined into one range.

use crate::locate::Match;
use crate::tree::Root;

/// Normalize one annotation's leaf matches.
///
/// The result is a fixpoint: no match can be lifted further and no two neighbours
/// share a target, so normalizing it again is a no-op.
pub fn normalize_matches(root: &Root, matches: Vec<Match>) -> Vec<Match> {
    let mut result: Vec<Match> = Vec::with_capacity(matches.len());

    for raw in matches {
        let mut current = promote(root, raw);

        while result
            .last()
            .is_some_and(|previous| previous.path == current.path)
        {
            let Some(previous) = result.pop() else {
                break;
            };
            current = promote(
                root,
                Match::new(current.path, previous.range.start..current.range.end),
            );
        }

        result.push(current);
    }

    result
}

/// Lift `candidate` while it spans its whole target, stopping at the root.
fn promote(root: &Root, mut candidate: Match) -> Match {
    while !candidate.path.is_empty() && candidate.range.start == 0 {
        let Some(len) = root.content_len(&candidate.path) else {
            break;
        };
        if candidate.range.end != len {
            break;
        }
        let Some(index) = candidate.path.pop() else {
            break;
        };
        candidate.range = index..index + 1;
    }
    candidate
}
