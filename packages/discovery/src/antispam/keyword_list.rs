//! Unnatural keyword list detection.
//!
//! Spam results are often bare keyword lists ("grants scholarships funding
//! aid") with no articles, prepositions, or verbs. Natural prose contains
//! connector words; fewer than two distinct connectors flags the text.

use std::collections::HashSet;

/// Distinct connector words required for text to count as natural.
const MIN_CONNECTOR_WORDS: usize = 2;

/// Connector words that appear in natural English text.
const CONNECTOR_WORDS: &[&str] = &[
    "the", "a", "an", "of", "for", "to", "in", "with", "on", "at", "by", "from", "as", "is",
    "are", "was", "were", "be", "been", "and", "or", "but", "if", "this", "that", "these",
    "those",
];

/// Detect an unnatural keyword list.
///
/// Matches connectors as whole words only, so "art" does not satisfy "a".
/// Blank text is not spam.
pub fn detect_unnatural_keyword_list(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }

    let words: HashSet<String> = super::word_tokens(text).into_iter().collect();

    let distinct_connectors = CONNECTOR_WORDS
        .iter()
        .filter(|&&connector| words.contains(connector))
        .count();

    distinct_connectors < MIN_CONNECTOR_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_list_is_spam() {
        assert!(detect_unnatural_keyword_list(
            "grants scholarships funding aid"
        ));
    }

    #[test]
    fn test_natural_sentence_is_not_spam() {
        assert!(!detect_unnatural_keyword_list(
            "Grants for students in Eastern Europe"
        ));
    }

    #[test]
    fn test_single_connector_is_still_spam() {
        // Only "for" appears: one distinct connector.
        assert!(detect_unnatural_keyword_list(
            "grants for scholarships funding aid tuition"
        ));
    }

    #[test]
    fn test_whole_word_matching() {
        // "art", "ton", "inner": substrings of connectors must not count.
        assert!(detect_unnatural_keyword_list("art ton inner grants"));
    }

    #[test]
    fn test_blank_text_is_not_spam() {
        assert!(!detect_unnatural_keyword_list(""));
        assert!(!detect_unnatural_keyword_list("  \t "));
    }
}
