//! Multi-signal confidence scoring.
//!
//! Combines TLD credibility with keyword signals to estimate how likely a
//! search result represents a legitimate funding source:
//!
//! - TLD credibility (-0.30 to +0.20)
//! - Funding keywords in title (+0.15) and description (+0.10)
//! - Geographic relevance: Bulgaria / EU / Eastern Europe (+0.15)
//! - Organization type: ministry, commission, foundation, university (+0.15)
//! - Compound boost (+0.15) when three or more keyword signals fire
//!
//! Scores are exact scale-2 decimals clamped to [0.00, 1.00], so the 0.60
//! candidate gate compares exactly.

mod credibility;

pub use credibility::tld_score;

use rust_decimal::Decimal;

use crate::types::RawSearchResult;
use credibility::score;

/// Minimum score for a result to become a review candidate.
pub fn candidate_threshold() -> Decimal {
    score(60)
}

const FUNDING_KEYWORDS: &[&str] = &[
    "grant",
    "grants",
    "funding",
    "scholarship",
    "scholarships",
    "fellowship",
    "fellowships",
    "subsidy",
    "subsidies",
    "bursary",
    "bursaries",
    "award",
    "awards",
    "stipend",
    "stipends",
    "financial aid",
    "financial support",
    "sponsorship",
    "endowment",
];

const GEOGRAPHIC_KEYWORDS: &[&str] = &[
    "bulgaria",
    "bulgarian",
    "българия",
    "българск",
    "eu",
    "european union",
    "europe",
    "european",
    "eastern europe",
    "балкан",
    "balkan",
    "romania",
    "romanian",
    "românia",
    "poland",
    "polish",
    "polska",
    "czech",
    "czechia",
    "české",
    "regional",
    "local",
];

const ORGANIZATION_KEYWORDS: &[&str] = &[
    "ministry",
    "minister",
    "министерство",
    "commission",
    "commissioner",
    "комисия",
    "foundation",
    "фондация",
    "fund",
    "university",
    "университет",
    "college",
    "government",
    "правителство",
    "official",
    "national",
    "state",
    "federal",
    "agency",
    "агенция",
    "authority",
    "council",
    "съвет",
    "chamber",
];

/// Signals required before the compound boost applies.
const COMPOUND_SIGNAL_COUNT: usize = 3;

/// Scores surviving results against the candidate gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    /// Calculate the confidence score for one result.
    pub fn score(&self, result: &RawSearchResult) -> Decimal {
        let title = result.title.as_deref();
        let description = result.description.as_deref();

        let mut total = tld_score(&result.domain);
        let mut signals = 0;

        if contains_keyword(title, FUNDING_KEYWORDS) {
            total += score(15);
            signals += 1;
        }

        if contains_keyword(description, FUNDING_KEYWORDS) {
            total += score(10);
            signals += 1;
        }

        if contains_keyword(title, GEOGRAPHIC_KEYWORDS)
            || contains_keyword(description, GEOGRAPHIC_KEYWORDS)
        {
            total += score(15);
            signals += 1;
        }

        if contains_keyword(title, ORGANIZATION_KEYWORDS)
            || contains_keyword(description, ORGANIZATION_KEYWORDS)
        {
            total += score(15);
            signals += 1;
        }

        // Convergent evidence beats any single weak signal.
        if signals >= COMPOUND_SIGNAL_COUNT {
            total += score(15);
        }

        total.clamp(Decimal::ZERO, Decimal::ONE).round_dp(2)
    }

    /// Whether a score clears the candidate gate.
    pub fn is_candidate(&self, confidence: Decimal) -> bool {
        confidence >= candidate_threshold()
    }
}

fn contains_keyword(text: Option<&str>, keywords: &[&str]) -> bool {
    let Some(text) = text else {
        return false;
    };

    if text.trim().is_empty() {
        return false;
    }

    let text = text.to_lowercase();
    keywords.iter().any(|keyword| text.contains(keyword))
}
