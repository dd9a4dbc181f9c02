//! Composite anti-spam filter.
//!
//! Four independent, side-effect-free detectors run in a fixed order against
//! one raw search result:
//!
//! 1. Keyword stuffing: excessive keyword repetition (unique ratio < 0.5)
//! 2. Domain-metadata mismatch: unrelated domain and metadata (cosine
//!    similarity < 0.15)
//! 3. Unnatural keyword list: missing natural-language structure (< 2
//!    connector words)
//! 4. Cross-category spam: vice-industry domain paired with funding metadata
//!
//! The aggregate is spam when ANY detector fires; the primary indicator is
//! the first detector (in the order above) that fired. Detectors fail open:
//! missing or blank text is never flagged.

mod cross_category;
mod keyword_list;
mod mismatch;
mod stuffing;

pub use cross_category::detect_cross_category_spam;
pub use keyword_list::detect_unnatural_keyword_list;
pub use mismatch::detect_domain_metadata_mismatch;
pub use stuffing::detect_keyword_stuffing;

use serde::{Deserialize, Serialize};

use crate::types::RawSearchResult;

/// Confidence added per firing detector, capped at 1.0.
const CONFIDENCE_PER_DETECTION: f64 = 0.35;

/// The category of heuristic that flagged a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpamIndicator {
    KeywordStuffing,
    DomainMetadataMismatch,
    UnnaturalKeywordList,
    CrossCategorySpam,
}

/// Aggregate spam analysis for one raw result. Produced fresh per result;
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamAnalysisResult {
    pub is_spam: bool,

    /// First detector that fired, in the fixed detector order.
    pub primary_indicator: Option<SpamIndicator>,

    /// min(1.0, 0.35 x firing detectors); 0.0 when clean.
    pub confidence: f64,

    pub rejection_reason: Option<String>,
}

impl SpamAnalysisResult {
    /// Clean result: nothing fired.
    pub fn not_spam() -> Self {
        Self {
            is_spam: false,
            primary_indicator: None,
            confidence: 0.0,
            rejection_reason: None,
        }
    }

    fn spam(indicator: SpamIndicator, reason: &str, confidence: f64) -> Self {
        Self {
            is_spam: true,
            primary_indicator: Some(indicator),
            confidence,
            rejection_reason: Some(reason.to_string()),
        }
    }
}

/// Runs the four detectors in their fixed order and folds the outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct AntiSpamFilter;

impl AntiSpamFilter {
    pub fn new() -> Self {
        Self
    }

    /// Analyze one raw result.
    pub fn analyze(&self, result: &RawSearchResult) -> SpamAnalysisResult {
        let text = result.combined_text();
        let title = result.title.as_deref();
        let description = result.description.as_deref();

        let detections: [(SpamIndicator, bool, &str); 4] = [
            (
                SpamIndicator::KeywordStuffing,
                detect_keyword_stuffing(&text),
                "keyword stuffing: excessive keyword repetition (unique ratio < 0.5)",
            ),
            (
                SpamIndicator::DomainMetadataMismatch,
                detect_domain_metadata_mismatch(&result.domain, title, description),
                "domain-metadata mismatch: domain keywords unrelated to page content (similarity < 0.15)",
            ),
            (
                SpamIndicator::UnnaturalKeywordList,
                detect_unnatural_keyword_list(&text),
                "unnatural keyword list: missing natural language structure (< 2 connector words)",
            ),
            (
                SpamIndicator::CrossCategorySpam,
                detect_cross_category_spam(&result.domain, title, description),
                "cross-category spam: vice-industry domain with funding content",
            ),
        ];

        let positives = detections.iter().filter(|(_, fired, _)| *fired).count();

        if positives == 0 {
            return SpamAnalysisResult::not_spam();
        }

        let confidence = (positives as f64 * CONFIDENCE_PER_DETECTION).min(1.0);
        let (indicator, _, reason) = detections
            .iter()
            .find(|(_, fired, _)| *fired)
            .expect("at least one detector fired");

        tracing::debug!(
            domain = %result.domain,
            indicator = ?indicator,
            positives,
            "Spam detected"
        );

        SpamAnalysisResult::spam(*indicator, reason, confidence)
    }
}

/// Lowercased word tokens, split on non-alphanumeric characters.
pub(crate) fn word_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderKind;
    use uuid::Uuid;

    fn result(domain_url: &str, title: &str, description: &str) -> RawSearchResult {
        RawSearchResult::from_url(domain_url, 1, ProviderKind::Brave, Uuid::new_v4())
            .unwrap()
            .with_title(title)
            .with_description(description)
    }

    #[test]
    fn test_clean_result_is_not_spam() {
        let analysis = AntiSpamFilter::new().analyze(&result(
            "https://scholarships.edu/apply",
            "Scholarships for International Students",
            "Find educational funding opportunities and apply for a grant",
        ));

        assert!(!analysis.is_spam);
        assert_eq!(analysis.primary_indicator, None);
        assert_eq!(analysis.confidence, 0.0);
        assert!(analysis.rejection_reason.is_none());
    }

    #[test]
    fn test_vice_domain_with_funding_metadata_is_spam() {
        let analysis = AntiSpamFilter::new().analyze(&result(
            "https://casino.com/scholarships",
            "Scholarships Grants Funding",
            "Education Financial Aid",
        ));

        assert!(analysis.is_spam);
        assert!(matches!(
            analysis.primary_indicator,
            Some(SpamIndicator::CrossCategorySpam) | Some(SpamIndicator::DomainMetadataMismatch)
        ));
    }

    #[test]
    fn test_confidence_scales_with_detections_and_caps() {
        // Fires mismatch, unnatural list, and cross-category at once.
        let analysis = AntiSpamFilter::new().analyze(&result(
            "https://pokerjackpot.com/",
            "scholarship grant funding tuition",
            "college university student aid",
        ));

        assert!(analysis.is_spam);
        assert!(analysis.confidence >= 0.35);
        assert!(analysis.confidence <= 1.0);
    }

    #[test]
    fn test_no_metadata_fails_open() {
        let bare = RawSearchResult::from_url(
            "https://pokerjackpot.com/",
            1,
            ProviderKind::Serper,
            Uuid::new_v4(),
        )
        .unwrap();

        let analysis = AntiSpamFilter::new().analyze(&bare);
        assert!(!analysis.is_spam);
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn test_word_tokens_split_and_lowercase() {
        assert_eq!(
            word_tokens("EU-Grants: apply now!"),
            vec!["eu", "grants", "apply", "now"]
        );
    }
}
