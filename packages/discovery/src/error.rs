//! Typed errors for the discovery library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::providers::ProviderKind;

/// Errors that can occur during discovery operations.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Every configured provider failed for this invocation.
    #[error("all search providers failed: {}", format_provider_errors(.errors))]
    AllProvidersFailed { errors: Vec<ProviderError> },

    /// No providers are configured at all.
    #[error("no search providers configured")]
    NoProvidersConfigured,

    /// Storage operation failed (registry or session store).
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Domain not found in the registry.
    #[error("domain not found: {name}")]
    DomainNotFound { name: String },

    /// Session not found in the session store.
    #[error("session not found: {id}")]
    SessionNotFound { id: uuid::Uuid },

    /// Session statistics may only be attached once.
    #[error("session already finalized: {id}")]
    SessionAlreadyFinalized { id: uuid::Uuid },

    /// URL could not be parsed or has no host.
    #[error("invalid result URL: {url}")]
    InvalidUrl { url: String },
}

/// Errors that can occur while executing a single provider search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Provider requires an API key and none was configured.
    #[error("{provider}: API key not configured")]
    MissingApiKey { provider: ProviderKind },

    /// Request exceeded the provider's timeout.
    #[error("{provider}: request timed out")]
    Timeout { provider: ProviderKind },

    /// Provider-side or local daily quota exhausted.
    #[error("{provider}: rate limit exceeded ({limit}/day)")]
    RateLimited { provider: ProviderKind, limit: u32 },

    /// API key rejected (HTTP 401/403).
    #[error("{provider}: unauthorized: {message}")]
    Auth {
        provider: ProviderKind,
        message: String,
    },

    /// Transport-level failure.
    #[error("{provider}: HTTP error: {source}")]
    Http {
        provider: ProviderKind,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Provider answered with a non-success status.
    #[error("{provider}: unexpected status {status}")]
    UnexpectedStatus { provider: ProviderKind, status: u16 },

    /// Response body did not parse into the expected shape.
    #[error("{provider}: invalid response: {message}")]
    InvalidResponse {
        provider: ProviderKind,
        message: String,
    },
}

impl SearchError {
    /// The provider this error originated from.
    pub fn provider(&self) -> ProviderKind {
        match self {
            SearchError::MissingApiKey { provider }
            | SearchError::Timeout { provider }
            | SearchError::RateLimited { provider, .. }
            | SearchError::Auth { provider, .. }
            | SearchError::Http { provider, .. }
            | SearchError::UnexpectedStatus { provider, .. }
            | SearchError::InvalidResponse { provider, .. } => *provider,
        }
    }
}

/// Classified category of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderErrorKind {
    Timeout,
    RateLimit,
    AuthFailure,
    Network,
}

impl ProviderErrorKind {
    /// Classify a structured search error.
    ///
    /// Variants that carry their category classify directly; transport and
    /// response errors fall back to message classification.
    pub fn classify(error: &SearchError) -> Self {
        match error {
            SearchError::Timeout { .. } => ProviderErrorKind::Timeout,
            SearchError::RateLimited { .. } => ProviderErrorKind::RateLimit,
            SearchError::Auth { .. } | SearchError::MissingApiKey { .. } => {
                ProviderErrorKind::AuthFailure
            }
            SearchError::Http { .. }
            | SearchError::UnexpectedStatus { .. }
            | SearchError::InvalidResponse { .. } => Self::classify_message(&error.to_string()),
        }
    }

    /// Classify a failure from its normalized description alone.
    pub fn classify_message(message: &str) -> Self {
        let message = message.to_lowercase();

        if message.contains("timeout") || message.contains("timed out") {
            ProviderErrorKind::Timeout
        } else if message.contains("429") || message.contains("rate limit") {
            ProviderErrorKind::RateLimit
        } else if message.contains("401")
            || message.contains("403")
            || message.contains("unauthorized")
            || message.contains("forbidden")
        {
            ProviderErrorKind::AuthFailure
        } else {
            ProviderErrorKind::Network
        }
    }
}

/// Record of a single provider's failure within one orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderError {
    /// Which provider failed.
    pub provider: ProviderKind,

    /// Classified error category.
    pub kind: ProviderErrorKind,

    /// Human-readable error message.
    pub message: String,

    /// When the failure was observed.
    pub occurred_at: DateTime<Utc>,

    /// The query that failed.
    pub query: String,
}

impl ProviderError {
    /// Build a record from a provider's search error.
    pub fn from_search_error(error: &SearchError, query: impl Into<String>) -> Self {
        Self {
            provider: error.provider(),
            kind: ProviderErrorKind::classify(error),
            message: error.to_string(),
            occurred_at: Utc::now(),
            query: query.into(),
        }
    }
}

fn format_provider_errors(errors: &[ProviderError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.provider, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Result type alias for provider searches.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_message_timeout() {
        assert_eq!(
            ProviderErrorKind::classify_message("request timed out after 5s"),
            ProviderErrorKind::Timeout
        );
    }

    #[test]
    fn test_classify_message_rate_limit() {
        assert_eq!(
            ProviderErrorKind::classify_message("Rate limit exceeded"),
            ProviderErrorKind::RateLimit
        );
        assert_eq!(
            ProviderErrorKind::classify_message("HTTP 429 from upstream"),
            ProviderErrorKind::RateLimit
        );
    }

    #[test]
    fn test_classify_message_auth() {
        assert_eq!(
            ProviderErrorKind::classify_message("401 Unauthorized"),
            ProviderErrorKind::AuthFailure
        );
        assert_eq!(
            ProviderErrorKind::classify_message("server said: Forbidden (403)"),
            ProviderErrorKind::AuthFailure
        );
    }

    #[test]
    fn test_classify_message_defaults_to_network() {
        assert_eq!(
            ProviderErrorKind::classify_message("connection reset by peer"),
            ProviderErrorKind::Network
        );
    }

    #[test]
    fn test_all_providers_failed_message() {
        let err = DiscoveryError::AllProvidersFailed { errors: vec![] };
        assert!(err.to_string().contains("all search providers failed"));
    }
}
