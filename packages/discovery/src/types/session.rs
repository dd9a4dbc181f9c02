//! Discovery sessions and their statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProviderError;
use crate::providers::ProviderKind;
use crate::types::result::ScoredResult;

/// Lifecycle status of a discovery session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Running,
    Completed,
    Failed,
}

impl SessionStatus {
    /// Stable string form used by the Postgres session store.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "RUNNING",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Failed => "FAILED",
        }
    }

    /// Parse the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RUNNING" => Some(SessionStatus::Running),
            "COMPLETED" => Some(SessionStatus::Completed),
            "FAILED" => Some(SessionStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate counters for one discovery session.
///
/// Created when orchestration starts, finalized exactly once, and attached to
/// the session record exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatistics {
    /// Results surviving the full pipeline (spam filter + dedup + blacklist).
    pub total_results_found: usize,

    /// Domains first seen in this pass.
    pub new_domains_discovered: usize,

    /// Surviving domains that already had a registry row.
    pub duplicate_domains_skipped: usize,

    /// Raw results dropped by the pipeline. This bucket combines spam
    /// rejections and intra-batch duplicates into a single metric.
    pub spam_results_filtered: usize,

    /// Raw result count per provider, recorded before any filtering.
    pub results_by_provider: BTreeMap<ProviderKind, usize>,
}

impl SessionStatistics {
    /// Number of providers that contributed at least one raw result.
    pub fn providers_with_results(&self) -> usize {
        self.results_by_provider.values().filter(|&&n| n > 0).count()
    }

    /// Total raw results across all providers, before filtering.
    pub fn total_raw_results(&self) -> usize {
        self.results_by_provider.values().sum()
    }
}

/// One discovery run, identified by a session id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySession {
    pub id: Uuid,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Attached exactly once, at finalization.
    pub statistics: Option<SessionStatistics>,

    /// Collected provider error messages, for reporting.
    pub error_messages: Vec<String>,
}

impl DiscoverySession {
    /// New running session.
    pub fn started(id: Uuid) -> Self {
        Self {
            id,
            status: SessionStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            statistics: None,
            error_messages: Vec::new(),
        }
    }
}

/// Outcome of one multi-provider search execution.
#[derive(Debug, Clone)]
pub struct SearchExecutionResult {
    /// Aggregated, scored results from successful providers.
    pub results: Vec<ScoredResult>,

    /// Errors from failed providers.
    pub provider_errors: Vec<ProviderError>,

    /// Finalized statistics for the owning session.
    pub statistics: SessionStatistics,
}

impl SearchExecutionResult {
    /// Every provider succeeded.
    pub fn is_full_success(&self) -> bool {
        self.provider_errors.is_empty()
    }

    /// Some providers succeeded and some failed.
    ///
    /// A provider that returned an empty result list still counts as a
    /// success; only providers that errored count against this.
    pub fn is_partial_success(&self) -> bool {
        !self.provider_errors.is_empty() && !self.statistics.results_by_provider.is_empty()
    }

    /// Every provider failed.
    pub fn is_complete_failure(&self) -> bool {
        !self.provider_errors.is_empty() && self.statistics.results_by_provider.is_empty()
    }

    /// Candidates eligible for human review (score at or above the gate).
    pub fn candidates(&self) -> impl Iterator<Item = &ScoredResult> {
        self.results.iter().filter(|r| r.is_candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_round_trip() {
        for status in [
            SessionStatus::Running,
            SessionStatus::Completed,
            SessionStatus::Failed,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_statistics_provider_counts() {
        let mut stats = SessionStatistics::default();
        stats.results_by_provider.insert(ProviderKind::Brave, 10);
        stats.results_by_provider.insert(ProviderKind::Tavily, 0);
        stats.results_by_provider.insert(ProviderKind::Serper, 5);

        assert_eq!(stats.providers_with_results(), 2);
        assert_eq!(stats.total_raw_results(), 15);
    }
}
