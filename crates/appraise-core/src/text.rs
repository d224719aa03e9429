//! Text processing utilities shared by the scoring heuristics

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

static SENTENCE_SPLIT: OnceLock<Regex> = OnceLock::new();

fn sentence_split() -> &'static Regex {
    SENTENCE_SPLIT.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence split regex"))
}

/// Lowercased whitespace tokens of a text.
///
/// This is deliberately naive: the accuracy reward compares raw token sets
/// against a reference answer, so punctuation attached to words stays put.
pub fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}

/// Lowercased whitespace tokens as a set, for overlap computations
pub fn token_set(text: &str) -> HashSet<String> {
    tokens(text).into_iter().collect()
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of sentences, never less than 1.
///
/// Splits on runs of `.`, `!`, `?` the same way the logic-density reward
/// expects: trailing empty fragments still count, so "a. b." is 3.
pub fn sentence_count(text: &str) -> usize {
    sentence_split().split(text).count().max(1)
}

/// Non-empty, trimmed paragraphs (blank-line separated)
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}
