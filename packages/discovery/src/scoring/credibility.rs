//! TLD credibility scoring.
//!
//! Classifies a domain's TLD into credibility buckets. Second-level
//! government and academic domains (gov.bg, ac.pl, europa.eu) are checked
//! before the final label, so "ministry.gov.bg" scores as government rather
//! than as the .bg ccTLD.

use rust_decimal::Decimal;

/// Government TLDs and second-level domains: +0.20.
const GOVERNMENT_SECOND_LEVEL: &[&str] = &[
    "gov.bg", "gov.ro", "gov.pl", "gov.cz", "gov.de", "gov.fr", "europa.eu",
];

/// Academic second-level domains: +0.15.
const ACADEMIC_SECOND_LEVEL: &[&str] = &[
    "edu.bg", "edu.ro", "edu.pl", "edu.cz", "ac.bg", "ac.ro", "ac.pl", "ac.cz",
];

/// Target-region country-code TLDs: +0.20.
const TARGET_REGION_CCTLDS: &[&str] = &[
    "bg", "ro", "pl", "cz", "de", "fr", "gr", "hu", "at", "it", "es",
];

/// Validated nonprofit and funding-specific TLDs: +0.15.
const NONPROFIT_TLDS: &[&str] = &["ngo", "ong", "foundation", "charity", "fund", "gives"];

/// Traditional nonprofit / international TLDs: +0.10.
const ORG_TLDS: &[&str] = &["org", "int", "eu"];

/// Spam-prone TLDs (free registrations, phishing favorites): -0.30.
const SPAM_TLDS: &[&str] = &[
    "xyz", "info", "top", "icu", "buzz", "tk", "ml", "ga", "cf", "gq", "loan", "click",
    "cam", "pw", "shop",
];

/// Credibility contribution of a domain's TLD, scale 2.
///
/// Commercial and unknown TLDs contribute 0.00.
pub fn tld_score(domain: &str) -> Decimal {
    let domain = domain.to_lowercase();
    let labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();

    if labels.len() < 2 {
        return score(0);
    }

    let second_level = format!("{}.{}", labels[labels.len() - 2], labels[labels.len() - 1]);
    if GOVERNMENT_SECOND_LEVEL.contains(&second_level.as_str()) {
        return score(20);
    }
    if ACADEMIC_SECOND_LEVEL.contains(&second_level.as_str()) {
        return score(15);
    }

    let tld = labels[labels.len() - 1];

    if tld == "gov" || TARGET_REGION_CCTLDS.contains(&tld) {
        score(20)
    } else if tld == "edu" || NONPROFIT_TLDS.contains(&tld) {
        score(15)
    } else if ORG_TLDS.contains(&tld) {
        score(10)
    } else if SPAM_TLDS.contains(&tld) {
        score(-30)
    } else {
        score(0)
    }
}

/// Hundredths as a scale-2 decimal: `score(15)` is 0.15.
pub(crate) fn score(hundredths: i64) -> Decimal {
    Decimal::new(hundredths, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_government_tlds() {
        assert_eq!(tld_score("grants.gov"), score(20));
        assert_eq!(tld_score("ministry.gov.bg"), score(20));
        assert_eq!(tld_score("ec.europa.eu"), score(20));
    }

    #[test]
    fn test_target_region_cctlds() {
        assert_eq!(tld_score("fondacia.bg"), score(20));
        assert_eq!(tld_score("stipendien.de"), score(20));
    }

    #[test]
    fn test_education_tlds() {
        assert_eq!(tld_score("scholarships.edu"), score(15));
        assert_eq!(tld_score("uni.ac.bg"), score(15));
    }

    #[test]
    fn test_nonprofit_and_org_tlds() {
        assert_eq!(tld_score("relief.ngo"), score(15));
        assert_eq!(tld_score("us-bulgaria.org"), score(10));
        assert_eq!(tld_score("esf.eu"), score(10));
    }

    #[test]
    fn test_commercial_tlds_are_neutral() {
        assert_eq!(tld_score("example.com"), score(0));
        assert_eq!(tld_score("example.net"), score(0));
    }

    #[test]
    fn test_spam_tlds_are_negative() {
        assert_eq!(tld_score("freegrants.xyz"), score(-30));
        assert_eq!(tld_score("win-money.tk"), score(-30));
        assert_eq!(tld_score("grants.info"), score(-30));
    }

    #[test]
    fn test_unknown_and_bare_hosts_are_neutral() {
        assert_eq!(tld_score("example.dev"), score(0));
        assert_eq!(tld_score("localhost"), score(0));
    }
}
