//! Derived-key computation shared by indexing and query resolution.

use std::collections::HashSet;

pub const NGRAM_SIZE: usize = 3;
pub const MIN_WORD_LENGTH: usize = 2;

/// Lowercased name without surrounding whitespace.
#[must_use]
pub fn exact_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lowercased whitespace-separated tokens of at least two characters, in order.
#[must_use]
pub fn word_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() >= MIN_WORD_LENGTH)
        .collect()
}

/// Every overlapping three-character window of the trimmed, lowercased text.
///
/// Repeated windows are kept so callers can count occurrences; text shorter
/// than three characters yields nothing.
#[must_use]
pub fn name_ngrams(text: &str) -> Vec<String> {
    let chars = text.trim().to_lowercase().chars().collect::<Vec<_>>();
    if chars.len() < NGRAM_SIZE {
        return Vec::new();
    }
    chars
        .windows(NGRAM_SIZE)
        .map(|window| window.iter().collect())
        .collect()
}

/// Prefixes (1..=max_len characters) of the trimmed, lowercased name and of each
/// word token, deduplicated in first-seen order.
#[must_use]
pub fn prefix_keys(name: &str, max_len: usize) -> Vec<String> {
    let lowered = name.trim().to_lowercase();
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let sources = std::iter::once(lowered.clone()).chain(word_tokens(&lowered));
    for source in sources {
        let mut prefix = String::new();
        for ch in source.chars().take(max_len) {
            prefix.push(ch);
            if seen.insert(prefix.clone()) {
                out.push(prefix.clone());
            }
        }
    }
    out
}
