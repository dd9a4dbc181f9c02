//! Keyword stuffing detection.
//!
//! Stuffed results repeat the same keywords to manipulate rankings.
//! Detected via the unique word ratio over the combined title + description:
//!
//! `unique_ratio = unique words / total words`
//!
//! Example: "grants scholarships funding grants scholarships grants funding
//! education grants" has 9 words, 4 unique, ratio 0.44: spam.

use std::collections::HashSet;

/// Unique-word ratio below which text counts as stuffed.
const UNIQUE_RATIO_THRESHOLD: f64 = 0.5;

/// Detect keyword stuffing in text.
///
/// A ratio of exactly 0.5 is not spam. Blank text is not spam.
pub fn detect_keyword_stuffing(text: &str) -> bool {
    let normalized = text.to_lowercase();
    let words: Vec<&str> = normalized.split_whitespace().collect();

    if words.is_empty() {
        return false;
    }

    let unique: HashSet<&str> = words.iter().copied().collect();
    let unique_ratio = unique.len() as f64 / words.len() as f64;

    unique_ratio < UNIQUE_RATIO_THRESHOLD
}
