//! Domain-metadata mismatch detection.
//!
//! Scam pages often pair an unrelated domain with funding-flavored metadata,
//! e.g. "casinowinners.com" titled "Education Scholarships". Keywords are
//! extracted from the domain name and compared against the title +
//! description via cosine similarity over term-frequency vectors.
//!
//! The 0.15 threshold is deliberately strict: false positives on legitimate
//! content are accepted because the other detectors and the confidence
//! aggregation compensate.

use std::collections::HashMap;

/// Cosine similarity below which domain and metadata count as unrelated.
const SIMILARITY_THRESHOLD: f64 = 0.15;

/// Tokens this short carry no signal and are dropped from both vectors.
const MIN_TOKEN_LEN: usize = 3;

/// Detect a domain-metadata mismatch.
///
/// Fails open: a blank domain, blank metadata, or a domain that yields no
/// usable keywords is never flagged.
pub fn detect_domain_metadata_mismatch(
    domain: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> bool {
    if domain.trim().is_empty() {
        return false;
    }

    let metadata = [title.unwrap_or(""), description.unwrap_or("")].join(" ");
    if metadata.trim().is_empty() {
        return false;
    }

    let domain_tokens = domain_keywords(domain);
    let domain_vector = term_frequencies(&domain_tokens);
    if domain_vector.is_empty() {
        return false;
    }

    let metadata_tokens = tokenize(&metadata);
    let metadata_vector = term_frequencies(&metadata_tokens);

    match cosine_similarity(&domain_vector, &metadata_vector) {
        Some(similarity) => similarity < SIMILARITY_THRESHOLD,
        None => false,
    }
}

/// Extract keyword tokens from a domain name.
///
/// Drops the final TLD label, then splits the rest on every non-alphabetic
/// character (hyphens, dots, digits). "casino-winners7.com" becomes
/// ["casino", "winners"].
fn domain_keywords(domain: &str) -> Vec<String> {
    let without_tld = match domain.rsplit_once('.') {
        Some((rest, _tld)) => rest,
        None => domain,
    };

    without_tld
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn tokenize(text: &str) -> Vec<String> {
    super::word_tokens(text)
}

fn term_frequencies(tokens: &[String]) -> HashMap<&str, u32> {
    let mut freq = HashMap::new();
    for token in tokens {
        if token.len() >= MIN_TOKEN_LEN {
            *freq.entry(token.as_str()).or_insert(0) += 1;
        }
    }
    freq
}

/// Cosine similarity between two term-frequency vectors.
///
/// `None` when either vector is empty.
fn cosine_similarity(a: &HashMap<&str, u32>, b: &HashMap<&str, u32>) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let dot: u64 = a
        .iter()
        .filter_map(|(term, &count)| b.get(term).map(|&other| count as u64 * other as u64))
        .sum();

    let norm = |v: &HashMap<&str, u32>| {
        (v.values().map(|&c| c as u64 * c as u64).sum::<u64>() as f64).sqrt()
    };

    Some(dot as f64 / (norm(a) * norm(b)))
}
