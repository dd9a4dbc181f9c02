//! Raw and scored search results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::providers::ProviderKind;

/// Extract the registrable domain from a URL.
///
/// Lowercases the host and strips a leading `www.`. Returns `None` for URLs
/// without a host (e.g. `mailto:` links that slip through a provider).
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    let domain = host.strip_prefix("www.").unwrap_or(&host);

    if domain.is_empty() {
        return None;
    }

    Some(domain.to_string())
}

/// One provider hit, before any filtering.
///
/// Transient: consumed by the aggregation pipeline and never persisted
/// directly. Cross-session memory lives in the domain registry instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSearchResult {
    /// The result URL as reported by the provider.
    pub url: Url,

    /// Registrable domain extracted from the URL.
    pub domain: String,

    /// Page title, if the provider reported one.
    pub title: Option<String>,

    /// Snippet/description, if the provider reported one.
    pub description: Option<String>,

    /// 1-based rank within this provider's result list.
    pub rank_position: u32,

    /// Provider that produced this hit.
    pub provider: ProviderKind,

    /// Discovery session this hit belongs to.
    pub session_id: Uuid,

    /// When this hit was collected.
    pub discovered_at: DateTime<Utc>,
}

impl RawSearchResult {
    /// Create a result, extracting the domain from the URL.
    ///
    /// Returns `None` when the URL has no usable host.
    pub fn new(
        url: Url,
        rank_position: u32,
        provider: ProviderKind,
        session_id: Uuid,
    ) -> Option<Self> {
        let domain = extract_domain(&url)?;

        Some(Self {
            url,
            domain,
            title: None,
            description: None,
            rank_position,
            provider,
            session_id,
            discovered_at: Utc::now(),
        })
    }

    /// Parse the URL and create a result.
    pub fn from_url(
        url: &str,
        rank_position: u32,
        provider: ProviderKind,
        session_id: Uuid,
    ) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        Self::new(url, rank_position, provider, session_id)
    }

    /// Add a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Title and description joined for text analysis.
    pub fn combined_text(&self) -> String {
        match (&self.title, &self.description) {
            (Some(t), Some(d)) => format!("{} {}", t, d),
            (Some(t), None) => t.clone(),
            (None, Some(d)) => d.clone(),
            (None, None) => String::new(),
        }
    }
}

/// A surviving result with its confidence score attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    /// The underlying search hit.
    pub result: RawSearchResult,

    /// Multi-signal confidence score, scale 2, in [0.00, 1.00].
    pub confidence: Decimal,

    /// True when the score clears the candidate gate.
    pub is_candidate: bool,
}
