//! Funding-Opportunity Search Discovery Pipeline
//!
//! Discovers candidate funding-opportunity web pages by querying several
//! external search providers concurrently, then filters, deduplicates, and
//! scores the combined results before handing high-confidence items to a
//! human-review workflow.
//!
//! # Architecture
//!
//! - [`providers`] - One [`SearchProvider`] trait over every external search
//!   engine, with per-instance quotas and timeouts
//! - [`antispam`] - Composite filter of four pure heuristic detectors
//! - [`scoring`] - Multi-signal confidence scorer with exact decimal scores
//! - [`registry`] - Persistent per-domain state: deduplication across
//!   sessions, blacklist, quality counters, retry backoff
//! - [`orchestrator`] - Concurrent fan-out, partial-failure tolerance, and
//!   the aggregation pipeline
//! - [`session`] - Discovery session lifecycle and statistics
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use discovery::{
//!     BraveProvider, MemoryRegistry, MemorySessionStore, SearchOrchestrator,
//!     TavilyProvider,
//! };
//!
//! let orchestrator = SearchOrchestrator::new(
//!     Arc::new(MemoryRegistry::new()),
//!     Arc::new(MemorySessionStore::new()),
//! )
//! .with_provider(Arc::new(BraveProvider::new(brave_key)))
//! .with_provider(Arc::new(TavilyProvider::new(tavily_key)));
//!
//! let outcome = orchestrator
//!     .execute_multi_provider_search(keyword_query, ai_query, 10, session_id)
//!     .await?;
//!
//! for candidate in outcome.candidates() {
//!     println!("{} ({})", candidate.result.url, candidate.confidence);
//! }
//! ```

pub mod antispam;
pub mod error;
pub mod orchestrator;
pub mod providers;
pub mod registry;
pub mod scoring;
pub mod session;
pub mod types;

// Re-export core types at crate root
pub use error::{DiscoveryError, ProviderError, ProviderErrorKind, SearchError};
pub use types::{
    extract_domain, DiscoverySession, DomainRecord, DomainStatus, RawSearchResult, Registration,
    ScoredResult, SearchExecutionResult, SessionStatistics, SessionStatus,
};

// Re-export the filter and scorer
pub use antispam::{AntiSpamFilter, SpamAnalysisResult, SpamIndicator};
pub use scoring::{candidate_threshold, tld_score, ConfidenceScorer};

// Re-export the registry and session stores
pub use registry::{retry_backoff, DomainRegistry, MemoryRegistry};
pub use session::{MemorySessionStore, SessionStore};

#[cfg(feature = "postgres")]
pub use registry::PostgresRegistry;

#[cfg(feature = "postgres")]
pub use session::PostgresSessionStore;

// Re-export providers
pub use providers::{
    BraveProvider, DailyQuota, MockFailure, MockSearchProvider, ProviderKind, QueryStyle,
    RateLimitedProvider, SearchProvider, SearxngProvider, SerperProvider, TavilyProvider,
};

// Re-export the orchestrator
pub use orchestrator::SearchOrchestrator;
