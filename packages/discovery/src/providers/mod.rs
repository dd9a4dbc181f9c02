//! Search provider abstraction and adapters.
//!
//! Every external search engine is wrapped behind the single
//! [`SearchProvider`] contract. Each implementation independently
//! rate-limits and time-bounds itself; the orchestrator treats them all
//! identically and dispatches the keyword or AI-optimized query according to
//! the provider's declared [`QueryStyle`].

mod brave;
mod quota;
mod rate_limited;
mod searxng;
mod serper;
mod tavily;

pub use brave::BraveProvider;
pub use quota::DailyQuota;
pub use rate_limited::RateLimitedProvider;
pub use searxng::SearxngProvider;
pub use serper::SerperProvider;
pub use tavily::TavilyProvider;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SearchError, SearchResult};
use crate::types::RawSearchResult;

/// Identifies a configured search provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderKind {
    Brave,
    Searxng,
    Serper,
    Tavily,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderKind::Brave => "brave",
            ProviderKind::Searxng => "searxng",
            ProviderKind::Serper => "serper",
            ProviderKind::Tavily => "tavily",
        };
        f.write_str(name)
    }
}

/// Which generated query a provider should receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStyle {
    /// Classic keyword search engines.
    Keyword,
    /// Providers that work best with a natural-language optimized query.
    AiOptimized,
}

/// A single external search engine.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Which provider this is.
    fn kind(&self) -> ProviderKind;

    /// Which query variant this provider should receive.
    fn query_style(&self) -> QueryStyle;

    /// Execute one search.
    ///
    /// Implementations enforce their own timeout and usage quota. Results
    /// carry 1-based, provider-local rank positions.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        session_id: Uuid,
    ) -> SearchResult<Vec<RawSearchResult>>;
}

/// Map a reqwest failure onto the provider error taxonomy.
pub(crate) fn transport_error(provider: ProviderKind, error: reqwest::Error) -> SearchError {
    if error.is_timeout() {
        SearchError::Timeout { provider }
    } else {
        SearchError::Http {
            provider,
            source: Box::new(error),
        }
    }
}

/// Reject auth failures, upstream rate limits, and other non-success codes.
pub(crate) fn check_status(
    provider: ProviderKind,
    status: reqwest::StatusCode,
    daily_limit: u32,
) -> SearchResult<()> {
    use reqwest::StatusCode;

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SearchError::Auth {
            provider,
            message: format!("API key rejected with status {}", status.as_u16()),
        });
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SearchError::RateLimited {
            provider,
            limit: daily_limit,
        });
    }

    if !status.is_success() {
        return Err(SearchError::UnexpectedStatus {
            provider,
            status: status.as_u16(),
        });
    }

    Ok(())
}

/// Failure a [`MockSearchProvider`] should simulate.
#[derive(Debug, Clone)]
pub enum MockFailure {
    Timeout,
    RateLimited { limit: u32 },
    Auth { message: String },
    Network { message: String },
}

/// Mock search provider for testing.
///
/// Returns deterministic, configurable results per query, or a simulated
/// failure.
pub struct MockSearchProvider {
    kind: ProviderKind,
    style: QueryStyle,
    results: RwLock<HashMap<String, Vec<MockHit>>>,
    failure: RwLock<Option<MockFailure>>,
}

#[derive(Debug, Clone)]
struct MockHit {
    url: String,
    title: Option<String>,
    description: Option<String>,
}

impl MockSearchProvider {
    /// Create a mock for the given provider slot.
    pub fn new(kind: ProviderKind, style: QueryStyle) -> Self {
        Self {
            kind,
            style,
            results: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
        }
    }

    /// Add `(url, title, description)` hits for a query.
    pub fn with_hits(self, query: &str, hits: &[(&str, &str, &str)]) -> Self {
        let hits = hits
            .iter()
            .map(|(url, title, description)| MockHit {
                url: url.to_string(),
                title: (!title.is_empty()).then(|| title.to_string()),
                description: (!description.is_empty()).then(|| description.to_string()),
            })
            .collect();
        self.results.write().unwrap().insert(query.to_string(), hits);
        self
    }

    /// Add bare URLs as hits for a query.
    pub fn with_urls(self, query: &str, urls: &[&str]) -> Self {
        let hits: Vec<(&str, &str, &str)> = urls.iter().map(|u| (*u, "", "")).collect();
        self.with_hits(query, &hits)
    }

    /// Make every search fail with the given failure.
    pub fn failing_with(self, failure: MockFailure) -> Self {
        *self.failure.write().unwrap() = Some(failure);
        self
    }

    fn build_error(&self, failure: &MockFailure) -> SearchError {
        match failure {
            MockFailure::Timeout => SearchError::Timeout {
                provider: self.kind,
            },
            MockFailure::RateLimited { limit } => SearchError::RateLimited {
                provider: self.kind,
                limit: *limit,
            },
            MockFailure::Auth { message } => SearchError::Auth {
                provider: self.kind,
                message: message.clone(),
            },
            MockFailure::Network { message } => SearchError::Http {
                provider: self.kind,
                source: message.clone().into(),
            },
        }
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn query_style(&self) -> QueryStyle {
        self.style
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        session_id: Uuid,
    ) -> SearchResult<Vec<RawSearchResult>> {
        if let Some(failure) = self.failure.read().unwrap().as_ref() {
            return Err(self.build_error(failure));
        }

        let hits = self
            .results
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default();

        Ok(hits
            .into_iter()
            .take(max_results)
            .enumerate()
            .filter_map(|(i, hit)| {
                let mut result =
                    RawSearchResult::from_url(&hit.url, (i + 1) as u32, self.kind, session_id)?;
                if let Some(title) = hit.title {
                    result = result.with_title(title);
                }
                if let Some(description) = hit.description {
                    result = result.with_description(description);
                }
                Some(result)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_ranked_hits() {
        let provider = MockSearchProvider::new(ProviderKind::Brave, QueryStyle::Keyword)
            .with_urls(
                "education grants",
                &["https://a.org/grants", "https://b.org/grants"],
            );

        let results = provider
            .search("education grants", 10, Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].rank_position, 1);
        assert_eq!(results[1].rank_position, 2);
        assert_eq!(results[0].domain, "a.org");
    }

    #[tokio::test]
    async fn test_mock_respects_max_results() {
        let provider = MockSearchProvider::new(ProviderKind::Serper, QueryStyle::Keyword)
            .with_urls("q", &["https://a.org", "https://b.org", "https://c.org"]);

        let results = provider.search("q", 2, Uuid::new_v4()).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_mock_unknown_query_is_empty() {
        let provider = MockSearchProvider::new(ProviderKind::Tavily, QueryStyle::AiOptimized);
        let results = provider.search("nothing", 5, Uuid::new_v4()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let provider = MockSearchProvider::new(ProviderKind::Brave, QueryStyle::Keyword)
            .failing_with(MockFailure::RateLimited { limit: 50 });

        let err = provider.search("q", 5, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, SearchError::RateLimited { limit: 50, .. }));
    }
}
