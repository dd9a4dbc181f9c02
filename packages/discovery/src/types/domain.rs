//! Domain registry records.
//!
//! A `DomainRecord` tracks one discovered domain across every discovery
//! session that touches it: deduplication memory, quality counters, blacklist
//! audit fields, and failure backoff. Deduplication is domain-level, not
//! URL-level: once `us-bulgaria.org` is known, further URLs on that host fold
//! into the same record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Processing status of a discovered domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainStatus {
    /// Seen in search results, not yet judged.
    Discovered,
    /// Currently being processed.
    Processing,
    /// At least one high-quality candidate came from this domain.
    ProcessedHighQuality,
    /// Judged, but nothing above the confidence gate so far.
    ProcessedLowQuality,
    /// Permanently excluded by an admin. Never auto-reverts.
    Blacklisted,
    /// Legitimate funder with no open programs this year.
    NoFundsThisYear,
    /// Processing failed; retry gated by `retry_after`.
    ProcessingFailed,
}

impl DomainStatus {
    /// Stable string form used by the Postgres registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainStatus::Discovered => "DISCOVERED",
            DomainStatus::Processing => "PROCESSING",
            DomainStatus::ProcessedHighQuality => "PROCESSED_HIGH_QUALITY",
            DomainStatus::ProcessedLowQuality => "PROCESSED_LOW_QUALITY",
            DomainStatus::Blacklisted => "BLACKLISTED",
            DomainStatus::NoFundsThisYear => "NO_FUNDS_THIS_YEAR",
            DomainStatus::ProcessingFailed => "PROCESSING_FAILED",
        }
    }

    /// Parse the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DISCOVERED" => Some(DomainStatus::Discovered),
            "PROCESSING" => Some(DomainStatus::Processing),
            "PROCESSED_HIGH_QUALITY" => Some(DomainStatus::ProcessedHighQuality),
            "PROCESSED_LOW_QUALITY" => Some(DomainStatus::ProcessedLowQuality),
            "BLACKLISTED" => Some(DomainStatus::Blacklisted),
            "NO_FUNDS_THIS_YEAR" => Some(DomainStatus::NoFundsThisYear),
            "PROCESSING_FAILED" => Some(DomainStatus::ProcessingFailed),
            _ => None,
        }
    }
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistent per-domain record, keyed by unique normalized domain name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Normalized domain name (e.g. "us-bulgaria.org"). Globally unique.
    pub domain_name: String,

    /// Current processing status.
    pub status: DomainStatus,

    /// When this domain was first discovered.
    pub discovered_at: DateTime<Utc>,

    /// Discovery session that first found this domain.
    pub discovery_session_id: Uuid,

    /// When search results from this domain were last judged.
    pub last_processed_at: Option<DateTime<Utc>>,

    /// How many judging passes have touched this domain.
    pub processing_count: u32,

    /// Running maximum confidence observed from this domain (scale 2).
    pub best_confidence_score: Option<Decimal>,

    /// Candidates at or above the confidence gate.
    pub high_quality_candidate_count: u32,

    /// Observations below the confidence gate.
    pub low_quality_candidate_count: u32,

    /// Admin who blacklisted this domain.
    pub blacklisted_by: Option<Uuid>,

    /// When the domain was blacklisted.
    pub blacklisted_at: Option<DateTime<Utc>>,

    /// Human-provided blacklist reason (e.g. "Known scam site").
    pub blacklist_reason: Option<String>,

    /// Year a "no funds this year" marking applies to.
    pub no_funds_year: Option<i32>,

    /// Free-form admin notes.
    pub notes: Option<String>,

    /// Consecutive processing failures.
    pub failure_count: u32,

    /// Reason for the most recent failure.
    pub failure_reason: Option<String>,

    /// Earliest time a failed domain becomes eligible for retry.
    pub retry_after: Option<DateTime<Utc>>,
}

impl DomainRecord {
    /// Fresh record for a newly discovered domain.
    pub fn discovered(domain_name: impl Into<String>, session_id: Uuid) -> Self {
        Self {
            domain_name: domain_name.into(),
            status: DomainStatus::Discovered,
            discovered_at: Utc::now(),
            discovery_session_id: session_id,
            last_processed_at: None,
            processing_count: 0,
            best_confidence_score: None,
            high_quality_candidate_count: 0,
            low_quality_candidate_count: 0,
            blacklisted_by: None,
            blacklisted_at: None,
            blacklist_reason: None,
            no_funds_year: None,
            notes: None,
            failure_count: 0,
            failure_reason: None,
            retry_after: None,
        }
    }
}

/// Outcome of a `register` call: the record plus whether it was just created.
#[derive(Debug, Clone)]
pub struct Registration {
    /// The existing or newly created record.
    pub domain: DomainRecord,

    /// True when this call created the row.
    pub newly_created: bool,
}
