//! In-memory registry implementation for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{DiscoveryError, Result};
use crate::registry::{retry_backoff, DomainRegistry};
use crate::types::{DomainRecord, DomainStatus, Registration};

/// In-memory domain registry.
///
/// Useful for testing and development; data is lost on restart. The
/// whole-map write lock serializes read-modify-write updates, which covers
/// the per-domain-key serialization the registry contract requires.
pub struct MemoryRegistry {
    domains: RwLock<HashMap<String, DomainRecord>>,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            domains: RwLock::new(HashMap::new()),
        }
    }

    /// Number of registered domains.
    pub fn domain_count(&self) -> usize {
        self.domains.read().unwrap().len()
    }

    fn update<F>(&self, domain_name: &str, apply: F) -> Result<DomainRecord>
    where
        F: FnOnce(&mut DomainRecord),
    {
        let mut domains = self.domains.write().unwrap();
        let record = domains
            .get_mut(domain_name)
            .ok_or_else(|| DiscoveryError::DomainNotFound {
                name: domain_name.to_string(),
            })?;

        apply(record);
        Ok(record.clone())
    }
}

#[async_trait]
impl DomainRegistry for MemoryRegistry {
    async fn register(&self, domain_name: &str, session_id: Uuid) -> Result<Registration> {
        let mut domains = self.domains.write().unwrap();

        if let Some(existing) = domains.get(domain_name) {
            return Ok(Registration {
                domain: existing.clone(),
                newly_created: false,
            });
        }

        let record = DomainRecord::discovered(domain_name, session_id);
        domains.insert(domain_name.to_string(), record.clone());

        tracing::debug!(domain = domain_name, "Domain registered");

        Ok(Registration {
            domain: record,
            newly_created: true,
        })
    }

    async fn should_process(&self, domain_name: &str) -> Result<bool> {
        let domains = self.domains.read().unwrap();
        Ok(domains
            .get(domain_name)
            .map(|record| record.status != DomainStatus::Blacklisted)
            .unwrap_or(true))
    }

    async fn update_candidate_counts(
        &self,
        domain_name: &str,
        high_delta: u32,
        low_delta: u32,
        observed_confidence: Decimal,
    ) -> Result<DomainRecord> {
        self.update(domain_name, |record| {
            record.high_quality_candidate_count += high_delta;
            record.low_quality_candidate_count += low_delta;

            let is_new_best = record
                .best_confidence_score
                .map(|best| observed_confidence > best)
                .unwrap_or(true);
            if is_new_best {
                record.best_confidence_score = Some(observed_confidence);
            }

            // Blacklist status is frozen; quality promotion applies otherwise.
            if record.status != DomainStatus::Blacklisted {
                if record.high_quality_candidate_count > 0 {
                    record.status = DomainStatus::ProcessedHighQuality;
                } else if record.low_quality_candidate_count > 0 {
                    record.status = DomainStatus::ProcessedLowQuality;
                }
            }

            record.processing_count += 1;
            record.last_processed_at = Some(Utc::now());
        })
    }

    async fn blacklist(
        &self,
        domain_name: &str,
        actor: Uuid,
        reason: &str,
    ) -> Result<DomainRecord> {
        let record = self.update(domain_name, |record| {
            record.status = DomainStatus::Blacklisted;
            record.blacklisted_by = Some(actor);
            record.blacklisted_at = Some(Utc::now());
            record.blacklist_reason = Some(reason.to_string());
        })?;

        tracing::info!(domain = domain_name, reason, "Domain blacklisted");
        Ok(record)
    }

    async fn mark_no_funds_this_year(
        &self,
        domain_name: &str,
        year: i32,
        notes: Option<&str>,
    ) -> Result<DomainRecord> {
        self.update(domain_name, |record| {
            if record.status != DomainStatus::Blacklisted {
                record.status = DomainStatus::NoFundsThisYear;
            }
            record.no_funds_year = Some(year);
            if let Some(notes) = notes {
                record.notes = Some(notes.to_string());
            }
        })
    }

    async fn record_processing_failure(
        &self,
        domain_name: &str,
        reason: &str,
    ) -> Result<DomainRecord> {
        let record = self.update(domain_name, |record| {
            record.failure_count += 1;
            record.failure_reason = Some(reason.to_string());
            if record.status != DomainStatus::Blacklisted {
                record.status = DomainStatus::ProcessingFailed;
            }
            record.retry_after = Some(Utc::now() + retry_backoff(record.failure_count));
        })?;

        tracing::warn!(
            domain = domain_name,
            failures = record.failure_count,
            retry_after = ?record.retry_after,
            reason,
            "Domain processing failed"
        );
        Ok(record)
    }

    async fn ready_for_retry(&self, now: DateTime<Utc>) -> Result<Vec<DomainRecord>> {
        let domains = self.domains.read().unwrap();
        Ok(domains
            .values()
            .filter(|record| {
                record.status == DomainStatus::ProcessingFailed
                    && record.retry_after.map(|t| t <= now).unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn find(&self, domain_name: &str) -> Result<Option<DomainRecord>> {
        Ok(self.domains.read().unwrap().get(domain_name).cloned())
    }

    async fn blacklisted(&self) -> Result<Vec<DomainRecord>> {
        let domains = self.domains.read().unwrap();
        Ok(domains
            .values()
            .filter(|record| record.status == DomainStatus::Blacklisted)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    async fn registry_with(name: &str) -> MemoryRegistry {
        let registry = MemoryRegistry::new();
        registry.register(name, Uuid::new_v4()).await.unwrap();
        registry
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let registry = MemoryRegistry::new();
        let session = Uuid::new_v4();

        let first = registry.register("us-bulgaria.org", session).await.unwrap();
        assert!(first.newly_created);

        registry
            .update_candidate_counts("us-bulgaria.org", 1, 0, Decimal::new(80, 2))
            .await
            .unwrap();

        let second = registry
            .register("us-bulgaria.org", Uuid::new_v4())
            .await
            .unwrap();
        assert!(!second.newly_created);
        // Re-registration returns the stored row unchanged.
        assert_eq!(second.domain.high_quality_candidate_count, 1);
        assert_eq!(
            second.domain.status,
            DomainStatus::ProcessedHighQuality
        );
        assert_eq!(registry.domain_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_domain_is_processable() {
        let registry = MemoryRegistry::new();
        assert!(registry.should_process("never-seen.org").await.unwrap());
    }

    #[tokio::test]
    async fn test_blacklist_is_permanent() {
        let registry = registry_with("scamsite.com").await;
        let admin = Uuid::new_v4();

        registry
            .blacklist("scamsite.com", admin, "Known scam site")
            .await
            .unwrap();

        assert!(!registry.should_process("scamsite.com").await.unwrap());

        // Quality updates and failures must not resurrect it.
        registry
            .update_candidate_counts("scamsite.com", 1, 0, Decimal::new(90, 2))
            .await
            .unwrap();
        registry
            .record_processing_failure("scamsite.com", "timeout")
            .await
            .unwrap();

        let record = registry.find("scamsite.com").await.unwrap().unwrap();
        assert_eq!(record.status, DomainStatus::Blacklisted);
        assert_eq!(record.blacklisted_by, Some(admin));
        assert_eq!(record.blacklist_reason.as_deref(), Some("Known scam site"));
        assert!(!registry.should_process("scamsite.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_candidate_counts_and_best_score() {
        let registry = registry_with("fund.org").await;

        let record = registry
            .update_candidate_counts("fund.org", 0, 1, Decimal::new(40, 2))
            .await
            .unwrap();
        assert_eq!(record.status, DomainStatus::ProcessedLowQuality);
        assert_eq!(record.best_confidence_score, Some(Decimal::new(40, 2)));

        let record = registry
            .update_candidate_counts("fund.org", 1, 0, Decimal::new(75, 2))
            .await
            .unwrap();
        assert_eq!(record.status, DomainStatus::ProcessedHighQuality);
        assert_eq!(record.best_confidence_score, Some(Decimal::new(75, 2)));

        // A later, weaker observation keeps the running max and the
        // high-quality status.
        let record = registry
            .update_candidate_counts("fund.org", 0, 1, Decimal::new(20, 2))
            .await
            .unwrap();
        assert_eq!(record.best_confidence_score, Some(Decimal::new(75, 2)));
        assert_eq!(record.status, DomainStatus::ProcessedHighQuality);
        assert_eq!(record.high_quality_candidate_count, 1);
        assert_eq!(record.low_quality_candidate_count, 2);
        assert_eq!(record.processing_count, 3);
    }

    #[tokio::test]
    async fn test_failure_backoff_schedule() {
        let registry = registry_with("flaky.org").await;
        let expected = [
            TimeDelta::hours(1),
            TimeDelta::hours(4),
            TimeDelta::days(1),
            TimeDelta::days(7),
        ];

        for (i, delta) in expected.iter().enumerate() {
            let before = Utc::now();
            let record = registry
                .record_processing_failure("flaky.org", "connection refused")
                .await
                .unwrap();
            let after = Utc::now();

            assert_eq!(record.failure_count, (i + 1) as u32);
            assert_eq!(record.status, DomainStatus::ProcessingFailed);

            let retry_after = record.retry_after.unwrap();
            assert!(retry_after >= before + *delta);
            assert!(retry_after <= after + *delta);
        }
    }

    #[tokio::test]
    async fn test_ready_for_retry() {
        let registry = registry_with("flaky.org").await;
        registry
            .register("healthy.org", Uuid::new_v4())
            .await
            .unwrap();

        registry
            .record_processing_failure("flaky.org", "timeout")
            .await
            .unwrap();

        // Backoff has not elapsed yet.
        let ready = registry.ready_for_retry(Utc::now()).await.unwrap();
        assert!(ready.is_empty());

        // An hour and a bit later the domain is eligible.
        let later = Utc::now() + TimeDelta::minutes(61);
        let ready = registry.ready_for_retry(later).await.unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].domain_name, "flaky.org");
    }

    #[tokio::test]
    async fn test_no_funds_this_year_stays_processable() {
        let registry = registry_with("quietfund.org").await;

        let record = registry
            .mark_no_funds_this_year("quietfund.org", 2025, Some("Check again next year"))
            .await
            .unwrap();

        assert_eq!(record.status, DomainStatus::NoFundsThisYear);
        assert_eq!(record.no_funds_year, Some(2025));
        assert!(registry.should_process("quietfund.org").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_domain_errors() {
        let registry = MemoryRegistry::new();
        let err = registry
            .update_candidate_counts("ghost.org", 1, 0, Decimal::new(70, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::DomainNotFound { .. }));
    }

    #[tokio::test]
    async fn test_blacklisted_listing() {
        let registry = registry_with("a.com").await;
        registry.register("b.com", Uuid::new_v4()).await.unwrap();
        registry
            .blacklist("a.com", Uuid::new_v4(), "spam aggregator")
            .await
            .unwrap();

        let listed = registry.blacklisted().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].domain_name, "a.com");
    }
}
