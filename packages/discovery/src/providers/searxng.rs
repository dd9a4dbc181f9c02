//! SearXNG adapter.
//!
//! Self-hosted metasearch instance: no API key and no daily quota, so the
//! only limit is the request timeout.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{SearchError, SearchResult};
use crate::providers::{check_status, transport_error, ProviderKind, QueryStyle, SearchProvider};
use crate::types::RawSearchResult;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(7);

pub struct SearxngProvider {
    client: reqwest::Client,
    base_url: String,
}

impl SearxngProvider {
    /// Point the adapter at a SearXNG instance, e.g. `http://localhost:8888`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("reqwest client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for SearxngProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Searxng
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
            #[serde(default)]
            results: Vec<SearxResult>,
        }

        #[derive(serde::Deserialize)]
        struct SearxResult {
            url: String,
            title: Option<String>,
            content: Option<String>,
        }

        tracing::debug!(query, max_results, "Executing SearXNG search");

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .header("Accept", "application/json")
            .query(&[("q", query), ("format", "json")])
            .send()
            .await
            .map_err(|e| transport_error(self.kind(), e))?;

        // No daily quota; a 429 here comes from the instance itself.
        check_status(self.kind(), response.status(), u32::MAX)?;

        let body: Response = response.json().await.map_err(|e| SearchError::InvalidResponse {
            provider: self.kind(),
            message: e.to_string(),
        })?;

        let results: Vec<RawSearchResult> = body
            .results
            .into_iter()
            .take(max_results)
            .enumerate()
            .filter_map(|(i, hit)| {
                let mut result =
                    RawSearchResult::from_url(&hit.url, (i + 1) as u32, self.kind(), session_id)?;
                if let Some(title) = hit.title {
                    result = result.with_title(title);
                }
                if let Some(content) = hit.content {
                    result = result.with_description(content);
                }
                Some(result)
            })
            .collect();

        tracing::info!(query, count = results.len(), "SearXNG search completed");

        Ok(results)
    }
}
