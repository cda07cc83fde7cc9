//! Keyword derivation from a free-text research topic.
//!
//! This is the fallback path when configuration supplies no explicit
//! keywords: callers log a warning when they reach for it, since derived
//! keywords are lossier than curated ones.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "from", "this", "have", "are", "was", "were", "has",
    "had", "but", "not", "all", "can", "will", "into", "out", "over", "under", "more", "than",
    "such", "their", "they", "them", "been", "also", "which", "when", "where", "who", "what",
    "how", "why", "your", "about", "after", "before", "between", "each", "other", "some", "any",
    "our", "his", "her", "its", "on", "in", "of", "to", "by", "as", "at", "an", "or", "is", "a",
    "be", "it",
];

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w+\b").expect("valid word regex"))
}

/// Derive search keywords from a research topic.
///
/// Lowercases, tokenizes on word boundaries, drops stop words and words of
/// three characters or fewer, and deduplicates keeping first-occurrence
/// order. Deterministic: the same topic always yields the same list. A
/// non-empty topic always yields at least one keyword: when filtering
/// leaves nothing, the whole topic becomes the single search term.
pub fn expand_keywords(research_topic: &str) -> Vec<String> {
    let topic = research_topic.to_lowercase();
    let mut seen = HashSet::new();
    let keywords: Vec<String> = word_pattern()
        .find_iter(&topic)
        .map(|word| word.as_str())
        .filter(|word| word.len() > 3 && !STOPWORDS.contains(word))
        .filter(|word| seen.insert(word.to_string()))
        .map(str::to_string)
        .collect();

    if keywords.is_empty() {
        let fallback = topic.trim();
        if !fallback.is_empty() {
            return vec![fallback.to_string()];
        }
    }
    keywords
}
