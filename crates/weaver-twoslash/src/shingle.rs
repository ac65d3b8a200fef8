//! Short, legible identifier seeds.
//!
//! A shingle is built from the initials of the first few and the last few words of
//! a string, so `const hi = 'Hello'` becomes `chHchH`. Identical seeds within one
//! run are told apart by a counter suffix: `chHchH`, `chHchH-1`, `chHchH-2`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use smol_str::SmolStr;

/// Words taken from each end of the value.
const SHINGLE_SIZE: usize = 4;

static UNICODE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{P}\p{S}]$").unwrap());

/// Occurrences of each shingle seen during one run.
#[derive(Debug, Default, Clone)]
pub struct ShingleCounts {
    counts: HashMap<SmolStr, u32>,
}

impl ShingleCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times `hash` was repeated after its first use, if it was seen at all.
    pub fn get(&self, hash: &str) -> Option<u32> {
        self.counts.get(hash).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Hash `value` into a shingle that is unique within `counts`.
pub fn small_shingle_hash(value: &str, counts: &mut ShingleCounts) -> String {
    let hash = small_shingle(value);
    let count = counts.counts.get(hash.as_str()).map_or(0, |count| count + 1);
    counts.counts.insert(SmolStr::from(hash.as_str()), count);

    if count == 0 {
        hash
    } else {
        format!("{hash}-{count}")
    }
}

fn small_shingle(value: &str) -> String {
    let mut shingle = String::new();
    let mut leading = 0;
    let mut at_word = true;

    for c in value.chars() {
        if is_punctuation(c) {
            continue;
        }
        if c.is_whitespace() {
            at_word = true;
        } else if at_word {
            shingle.push(c);
            leading += 1;
            if leading >= SHINGLE_SIZE {
                break;
            }
            at_word = false;
        }
    }

    // Walking backwards, the last letter seen before whitespace starts the word.
    let mut trailing = Vec::with_capacity(SHINGLE_SIZE);
    let mut word_start = None;

    for c in value.chars().rev() {
        if is_punctuation(c) {
            continue;
        }
        if c.is_whitespace() {
            if let Some(initial) = word_start.take() {
                trailing.push(initial);
                if trailing.len() >= SHINGLE_SIZE {
                    break;
                }
            }
        } else {
            word_start = Some(c);
        }
    }

    if let Some(initial) = word_start {
        trailing.push(initial);
    }

    shingle.extend(trailing.into_iter().rev());
    shingle
}

fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation();
    }
    let mut buffer = [0; 4];
    UNICODE_PUNCTUATION.is_match(c.encode_utf8(&mut buffer))
}
