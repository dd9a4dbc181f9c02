//! Serper.dev adapter (Google results over a JSON API).

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::error::{SearchError, SearchResult};
use crate::providers::{
    check_status, transport_error, DailyQuota, ProviderKind, QueryStyle, SearchProvider,
};
use crate::types::RawSearchResult;

const DEFAULT_BASE_URL: &str = "https://google.serper.dev/search";
const DEFAULT_DAILY_LIMIT: u32 = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SerperProvider {
    api_key: SecretString,
    client: reqwest::Client,
    base_url: String,
    quota: DailyQuota,
}

impl SerperProvider {
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
impl SearchProvider for SerperProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Serper
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
        #[derive(serde::Serialize)]
        struct Request<'a> {
            q: &'a str,
            num: usize,
        }

        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(default)]
            organic: Vec<OrganicResult>,
        }

        #[derive(serde::Deserialize)]
        struct OrganicResult {
            link: String,
            title: Option<String>,
            snippet: Option<String>,
            position: Option<u32>,
        }

        self.quota.try_acquire(self.kind())?;

        tracing::debug!(query, max_results, "Executing Serper search");

        let response = self
            .client
            .post(&self.base_url)
            .header("Content-Type", "application/json")
            .header("X-API-KEY", self.api_key.expose_secret())
            .json(&Request {
                q: query,
                num: max_results,
            })
            .send()
            .await
            .map_err(|e| transport_error(self.kind(), e))?;

        check_status(self.kind(), response.status(), self.quota.limit())?;

        let body: Response = response.json().await.map_err(|e| SearchError::InvalidResponse {
            provider: self.kind(),
            message: e.to_string(),
        })?;

        let results: Vec<RawSearchResult> = body
            .organic
            .into_iter()
            .take(max_results)
            .enumerate()
            .filter_map(|(i, hit)| {
                // Serper reports Google's own rank; fall back to list order.
                let rank = hit.position.unwrap_or((i + 1) as u32);
                let mut result =
                    RawSearchResult::from_url(&hit.link, rank, self.kind(), session_id)?;
                if let Some(title) = hit.title {
                    result = result.with_title(title);
                }
                if let Some(snippet) = hit.snippet {
                    result = result.with_description(snippet);
                }
                Some(result)
            })
            .collect();

        tracing::info!(
            query,
            count = results.len(),
            used = self.quota.used_today(),
            limit = self.quota.limit(),
            "Serper search completed"
        );

        Ok(results)
    }
}
