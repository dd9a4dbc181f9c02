//! Request-pacing wrapper for search providers.
//!
//! Wraps any [`SearchProvider`] with a governor rate limiter so bursts of
//! orchestrations spread their requests out instead of tripping the
//! provider's server-side limits.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use uuid::Uuid;

use crate::error::SearchResult;
use crate::providers::{ProviderKind, QueryStyle, SearchProvider};
use crate::types::RawSearchResult;

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A provider wrapper that paces outgoing requests.
pub struct RateLimitedProvider<P: SearchProvider> {
    inner: P,
    limiter: Arc<DirectRateLimiter>,
}

impl<P: SearchProvider> RateLimitedProvider<P> {
    /// Wrap a provider with a sustained requests-per-second limit.
    pub fn new(provider: P, requests_per_second: u32) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_second).expect("requests_per_second must be > 0"),
        );
        Self {
            inner: provider,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Wrap with a custom governor quota.
    pub fn with_quota(provider: P, quota: Quota) -> Self {
        Self {
            inner: provider,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }
}

#[async_trait]
impl<P: SearchProvider> SearchProvider for RateLimitedProvider<P> {
    fn kind(&self) -> ProviderKind {
        self.inner.kind()
    }

    fn query_style(&self) -> QueryStyle {
        self.inner.query_style()
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        session_id: Uuid,
    ) -> SearchResult<Vec<RawSearchResult>> {
        self.limiter.until_ready().await;
        self.inner.search(query, max_results, session_id).await
    }
}
