//! Persistent per-domain registry.
//!
//! The registry is the pipeline's only cross-session memory: deduplication,
//! blacklist, quality counters, and failure backoff all live here. Records
//! are keyed by unique normalized domain name.
//!
//! Updates are per-domain-key read-modify-write; implementations must
//! serialize concurrent updates to the same key so overlapping aggregation
//! batches never lose counter increments.

mod memory;

#[cfg(feature = "postgres")]
mod postgres;

pub use memory::MemoryRegistry;

#[cfg(feature = "postgres")]
pub use postgres::PostgresRegistry;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{DomainRecord, Registration};

/// Escalating delay before a failed domain is retried.
///
/// 1st failure: 1 hour; 2nd: 4 hours; 3rd: 1 day; 4th and beyond: 7 days.
pub fn retry_backoff(failure_count: u32) -> TimeDelta {
    match failure_count {
        0 | 1 => TimeDelta::hours(1),
        2 => TimeDelta::hours(4),
        3 => TimeDelta::days(1),
        _ => TimeDelta::days(7),
    }
}

/// Cross-session domain state store.
#[async_trait]
pub trait DomainRegistry: Send + Sync {
    /// Get-or-create a record by unique name.
    ///
    /// Idempotent: when the domain already exists the stored row is returned
    /// unchanged, with `newly_created == false`. Status and counters are
    /// never overwritten by re-registration.
    async fn register(&self, domain_name: &str, session_id: Uuid) -> Result<Registration>;

    /// Whether the pipeline may process results from this domain.
    ///
    /// False only for blacklisted domains; unknown domains and every other
    /// status are processable.
    async fn should_process(&self, domain_name: &str) -> Result<bool>;

    /// Apply one judging pass: counter increments, running-max best score,
    /// and quality-based status promotion.
    async fn update_candidate_counts(
        &self,
        domain_name: &str,
        high_delta: u32,
        low_delta: u32,
        observed_confidence: Decimal,
    ) -> Result<DomainRecord>;

    /// Permanently exclude a domain, with audit fields. Never expires and is
    /// never reversed automatically.
    async fn blacklist(&self, domain_name: &str, actor: Uuid, reason: &str)
        -> Result<DomainRecord>;

    /// Mark a legitimate funder as having no open programs for `year`.
    async fn mark_no_funds_this_year(
        &self,
        domain_name: &str,
        year: i32,
        notes: Option<&str>,
    ) -> Result<DomainRecord>;

    /// Record a processing failure and schedule the retry backoff.
    async fn record_processing_failure(
        &self,
        domain_name: &str,
        reason: &str,
    ) -> Result<DomainRecord>;

    /// Failed domains whose backoff has elapsed.
    async fn ready_for_retry(&self, now: DateTime<Utc>) -> Result<Vec<DomainRecord>>;

    /// Look up a record by name.
    async fn find(&self, domain_name: &str) -> Result<Option<DomainRecord>>;

    /// All blacklisted domains, for admin tooling.
    async fn blacklisted(&self) -> Result<Vec<DomainRecord>>;
}
