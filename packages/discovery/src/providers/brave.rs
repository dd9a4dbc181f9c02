//! Brave Search API adapter.
//!
//! Independent (non-Google) index with a JSON Web Search API. The free tier
//! is tight, so the default daily quota is a conservative 50 requests.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::error::{SearchError, SearchResult};
use crate::providers::{
    check_status, transport_error, DailyQuota, ProviderKind, QueryStyle, SearchProvider,
};
use crate::types::RawSearchResult;

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com/res/v1/web/search";
const DEFAULT_DAILY_LIMIT: u32 = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct BraveProvider {
    api_key: SecretString,
    client: reqwest::Client,
    base_url: String,
    quota: DailyQuota,
}

impl BraveProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("reqwest client"),
            base_url: DEFAULT_BASE_URL.to_string(),
            quota: DailyQuota::new(DEFAULT_DAILY_LIMIT),
        }
    }

    /// Override the API endpoint (for tests against a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the daily request budget.
    pub fn with_daily_limit(mut self, limit: u32) -> Self {
        self.quota = DailyQuota::new(limit);
        self
    }
}

#[async_trait]
impl SearchProvider for BraveProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Brave
    }

    fn query_style(&self) -> QueryStyle {
        QueryStyle::Keyword
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        session_id: Uuid,
    ) -> SearchResult<Vec<RawSearchResult>> {
        #[derive(serde::Deserialize)]
        struct Response {
            web: Option<WebResults>,
        }

        #[derive(serde::Deserialize)]
        struct WebResults {
            #[serde(default)]
            results: Vec<WebResult>,
        }

        #[derive(serde::Deserialize)]
        struct WebResult {
            url: String,
            title: Option<String>,
            description: Option<String>,
        }

        self.quota.try_acquire(self.kind())?;

        tracing::debug!(query, max_results, "Executing Brave search");

        let count = max_results.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", self.api_key.expose_secret())
            .query(&[("q", query), ("count", count.as_str())])
            .send()
            .await
            .map_err(|e| transport_error(self.kind(), e))?;

        check_status(self.kind(), response.status(), self.quota.limit())?;

        let body: Response = response.json().await.map_err(|e| SearchError::InvalidResponse {
            provider: self.kind(),
            message: e.to_string(),
        })?;

        let results: Vec<RawSearchResult> = body
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .take(max_results)
            .enumerate()
            .filter_map(|(i, hit)| {
                let mut result =
                    RawSearchResult::from_url(&hit.url, (i + 1) as u32, self.kind(), session_id)?;
                if let Some(title) = hit.title {
                    result = result.with_title(title);
                }
                if let Some(description) = hit.description {
                    result = result.with_description(description);
                }
                Some(result)
            })
            .collect();

        tracing::info!(
            query,
            count = results.len(),
            used = self.quota.used_today(),
            limit = self.quota.limit(),
            "Brave search completed"
        );

        Ok(results)
    }
}
