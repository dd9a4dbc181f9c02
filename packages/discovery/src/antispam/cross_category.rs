//! Cross-category spam detection.
//!
//! Gambling sites and essay mills create funding-flavored pages to capture
//! search traffic, e.g. "casinowinners.com/scholarships" titled "Apply for
//! Scholarships". Flagged when the domain carries vice vocabulary AND the
//! metadata carries funding vocabulary. Legitimate education or government
//! domains never match the vice check, so funding metadata alone is fine.

const GAMBLING_KEYWORDS: &[&str] = &[
    "casino", "poker", "betting", "bet", "win", "lottery", "jackpot", "slots", "gamble",
    "wager",
];

const ESSAY_MILL_KEYWORDS: &[&str] = &[
    "essay", "paper", "dissertation", "thesis", "assignment", "homework", "writeessay",
    "essaywriter",
];

const FUNDING_KEYWORDS: &[&str] = &[
    "scholarship", "grant", "funding", "education", "student", "tuition", "financial aid",
    "college", "university",
];

/// Detect cross-category spam.
///
/// Blank domain or metadata is not spam.
pub fn detect_cross_category_spam(
    domain: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> bool {
    if domain.trim().is_empty() {
        return false;
    }

    let domain = domain.to_lowercase();
    let metadata = [title.unwrap_or(""), description.unwrap_or("")]
        .join(" ")
        .to_lowercase();

    if metadata.trim().is_empty() {
        return false;
    }

    let domain_is_vice = contains_any(&domain, GAMBLING_KEYWORDS)
        || contains_any(&domain, ESSAY_MILL_KEYWORDS);

    if !domain_is_vice {
        return false;
    }

    contains_any(&metadata, FUNDING_KEYWORDS)
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_casino_domain_with_scholarship_metadata_is_spam() {
        assert!(detect_cross_category_spam(
            "casinowinners.com",
            Some("Apply for Scholarships"),
            Some("Education grants for students"),
        ));
    }

    #[test]
    fn test_essay_mill_domain_with_funding_metadata_is_spam() {
        assert!(detect_cross_category_spam(
            "essaywriterpro.com",
            Some("Student Scholarships 2025"),
            None,
        ));
    }

    #[test]
    fn test_education_domain_with_funding_metadata_is_not_spam() {
        assert!(!detect_cross_category_spam(
            "scholarships.edu",
            Some("Scholarships for International Students"),
            Some("Find educational funding opportunities"),
        ));
    }

    #[test]
    fn test_government_domain_is_not_spam() {
        assert!(!detect_cross_category_spam(
            "ministry.gov.bg",
            Some("National grant programs"),
            None,
        ));
    }

    #[test]
    fn test_vice_domain_without_funding_metadata_is_not_spam() {
        assert!(!detect_cross_category_spam(
            "casinowinners.com",
            Some("Play slots online"),
            Some("Best odds on the web"),
        ));
    }

    #[test]
    fn test_blank_metadata_is_not_spam() {
        assert!(!detect_cross_category_spam("casinowinners.com", None, None));
    }
}
