//! Multi-provider search orchestration.
//!
//! Fans one query pair out to every configured provider concurrently,
//! tolerates partial failure, and drives the aggregation pipeline:
//!
//! 1. Execute all providers in parallel; collect per-provider outcomes
//! 2. Anti-spam filtering
//! 3. Blacklist check against the domain registry
//! 4. Intra-batch domain deduplication (best rank wins)
//! 5. Confidence scoring and registry counter updates
//! 6. Session statistics and lifecycle
//!
//! A single provider's failure never aborts the others; only total failure
//! surfaces as a hard error. The orchestrator imposes no deadline of its own
//! beyond each provider's client timeout and never cancels stragglers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::antispam::AntiSpamFilter;
use crate::error::{DiscoveryError, ProviderError, Result};
use crate::providers::{ProviderKind, QueryStyle, SearchProvider};
use crate::registry::DomainRegistry;
use crate::scoring::ConfidenceScorer;
use crate::session::SessionStore;
use crate::types::{
    RawSearchResult, ScoredResult, SearchExecutionResult, SessionStatistics, SessionStatus,
};

/// Orchestrates concurrent multi-provider searches and candidate curation.
///
/// Provider registration order is the deterministic tie-break order: when two
/// providers report the same domain at the same rank position, the
/// earlier-registered provider's result survives aggregation.
pub struct SearchOrchestrator {
    providers: Vec<Arc<dyn SearchProvider>>,
    spam_filter: AntiSpamFilter,
    scorer: ConfidenceScorer,
    registry: Arc<dyn DomainRegistry>,
    sessions: Arc<dyn SessionStore>,
}

struct PipelineOutcome {
    survivors: Vec<RawSearchResult>,
    spam: Vec<RawSearchResult>,
}

impl SearchOrchestrator {
    pub fn new(registry: Arc<dyn DomainRegistry>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            providers: Vec::new(),
            spam_filter: AntiSpamFilter::new(),
            scorer: ConfidenceScorer::new(),
            registry,
            sessions,
        }
    }

    /// Register a provider. Registration order fixes the tie-break order.
    pub fn with_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Registered providers, in tie-break order.
    pub fn providers(&self) -> &[Arc<dyn SearchProvider>] {
        &self.providers
    }

    /// Execute one discovery search across all configured providers.
    ///
    /// Keyword-style providers receive `keyword_query`; AI-style providers
    /// receive `ai_optimized_query`. Blocks until every provider completes,
    /// then aggregates, scores, updates the registry, and finalizes the
    /// owning session record.
    pub async fn execute_multi_provider_search(
        &self,
        keyword_query: &str,
        ai_optimized_query: &str,
        max_results: usize,
        session_id: Uuid,
    ) -> Result<SearchExecutionResult> {
        if self.providers.is_empty() {
            return Err(DiscoveryError::NoProvidersConfigured);
        }

        tracing::info!(
            session = %session_id,
            keyword_query,
            ai_optimized_query,
            max_results,
            providers = self.providers.len(),
            "Starting multi-provider search"
        );

        let started = Instant::now();
        self.sessions.create(session_id).await?;

        let searches = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let query = match provider.query_style() {
                QueryStyle::Keyword => keyword_query.to_string(),
                QueryStyle::AiOptimized => ai_optimized_query.to_string(),
            };

            async move {
                let outcome = provider.search(&query, max_results, session_id).await;
                (provider.kind(), query, outcome)
            }
        });

        // Join all providers; no early cancellation of stragglers.
        let outcomes = join_all(searches).await;

        let mut batches: Vec<(ProviderKind, Vec<RawSearchResult>)> = Vec::new();
        let mut errors: Vec<ProviderError> = Vec::new();

        for (kind, query, outcome) in outcomes {
            match outcome {
                Ok(results) => {
                    tracing::debug!(provider = %kind, count = results.len(), "Provider succeeded");
                    batches.push((kind, results));
                }
                Err(error) => {
                    tracing::warn!(provider = %kind, %error, "Provider failed");
                    errors.push(ProviderError::from_search_error(&error, query));
                }
            }
        }

        if batches.is_empty() {
            let messages = errors.iter().map(|e| e.message.clone()).collect();
            self.sessions
                .finalize(
                    session_id,
                    SessionStatus::Failed,
                    SessionStatistics::default(),
                    messages,
                )
                .await?;
            return Err(DiscoveryError::AllProvidersFailed { errors });
        }

        let mut statistics = SessionStatistics::default();
        for (kind, results) in &batches {
            statistics.results_by_provider.insert(*kind, results.len());
        }
        let raw_total = statistics.total_raw_results();

        let outcome = self.run_pipeline(batches).await?;
        let scored = self.score_and_record(outcome, session_id, &mut statistics).await;

        statistics.total_results_found = scored.len();
        // Combined bucket: spam rejections plus intra-batch duplicates.
        statistics.spam_results_filtered = raw_total - scored.len();

        let status = SessionStatus::Completed;
        let messages = errors.iter().map(|e| e.message.clone()).collect();
        self.sessions
            .finalize(session_id, status, statistics.clone(), messages)
            .await?;

        tracing::info!(
            session = %session_id,
            duration_ms = started.elapsed().as_millis() as u64,
            results = scored.len(),
            errors = errors.len(),
            "Multi-provider search completed"
        );

        Ok(SearchExecutionResult {
            results: scored,
            provider_errors: errors,
            statistics,
        })
    }

    /// Aggregate raw provider batches into one deduplicated result list.
    ///
    /// Flattens in provider registration order, discards spam, drops
    /// blacklisted domains, and keeps exactly one result per domain: the one
    /// with the lowest rank position. Rank ties go to the earlier provider.
    pub async fn aggregate_results(
        &self,
        results_by_provider: Vec<(ProviderKind, Vec<RawSearchResult>)>,
    ) -> Result<Vec<RawSearchResult>> {
        Ok(self.run_pipeline(results_by_provider).await?.survivors)
    }

    async fn run_pipeline(
        &self,
        results_by_provider: Vec<(ProviderKind, Vec<RawSearchResult>)>,
    ) -> Result<PipelineOutcome> {
        let all_results: Vec<RawSearchResult> = results_by_provider
            .into_iter()
            .flat_map(|(_, results)| results)
            .collect();
        let total = all_results.len();

        if all_results.is_empty() {
            return Ok(PipelineOutcome {
                survivors: Vec::new(),
                spam: Vec::new(),
            });
        }

        // Stage 1: anti-spam filtering.
        let mut non_spam = Vec::with_capacity(all_results.len());
        let mut spam = Vec::new();

        for result in all_results {
            let analysis = self.spam_filter.analyze(&result);
            if analysis.is_spam {
                tracing::debug!(
                    domain = %result.domain,
                    reason = analysis.rejection_reason.as_deref().unwrap_or(""),
                    "Spam filtered"
                );
                spam.push(result);
            } else {
                non_spam.push(result);
            }
        }

        tracing::info!(
            total,
            non_spam = non_spam.len(),
            filtered = spam.len(),
            "Anti-spam filtering complete"
        );

        // Stage 2: blacklist check. Fail-closed: a blacklisted domain is
        // always rejected regardless of other signals.
        let mut processable = Vec::with_capacity(non_spam.len());
        let mut known: HashMap<String, bool> = HashMap::new();
        let mut blacklisted_skipped = 0usize;

        for result in non_spam {
            let allowed = match known.get(&result.domain) {
                Some(allowed) => *allowed,
                None => {
                    let allowed = self.registry.should_process(&result.domain).await?;
                    known.insert(result.domain.clone(), allowed);
                    allowed
                }
            };

            if allowed {
                processable.push(result);
            } else {
                tracing::debug!(domain = %result.domain, "Blacklisted domain skipped");
                blacklisted_skipped += 1;
            }
        }

        // Stage 3: intra-batch deduplication, best rank per domain. Strict
        // comparison keeps the earliest-registered provider on rank ties.
        let mut best: HashMap<String, RawSearchResult> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();

        for result in processable {
            match best.get(&result.domain) {
                None => {
                    first_seen.push(result.domain.clone());
                    best.insert(result.domain.clone(), result);
                }
                Some(existing) if result.rank_position < existing.rank_position => {
                    best.insert(result.domain.clone(), result);
                }
                Some(_) => {}
            }
        }

        let survivors: Vec<RawSearchResult> = first_seen
            .into_iter()
            .filter_map(|domain| best.remove(&domain))
            .collect();

        tracing::info!(
            unique_domains = survivors.len(),
            blacklisted_skipped,
            "Domain deduplication complete"
        );

        Ok(PipelineOutcome { survivors, spam })
    }

    /// Score survivors, update registry counters, and emit scored results.
    ///
    /// Spam-filtered results still register their domain and tally a
    /// low-quality observation; blacklisted domains stay untouched. Registry
    /// failures here never invalidate a decision already computed in this
    /// pass: the scored result is kept and the bookkeeping gap is logged.
    async fn score_and_record(
        &self,
        outcome: PipelineOutcome,
        session_id: Uuid,
        statistics: &mut SessionStatistics,
    ) -> Vec<ScoredResult> {
        let mut scored = Vec::with_capacity(outcome.survivors.len());

        for result in outcome.survivors {
            let confidence = self.scorer.score(&result);
            let is_candidate = self.scorer.is_candidate(confidence);
            let (high, low) = if is_candidate { (1, 0) } else { (0, 1) };

            match self.registry.register(&result.domain, session_id).await {
                Ok(registration) => {
                    if registration.newly_created {
                        statistics.new_domains_discovered += 1;
                    } else {
                        statistics.duplicate_domains_skipped += 1;
                    }

                    if let Err(error) = self
                        .registry
                        .update_candidate_counts(&result.domain, high, low, confidence)
                        .await
                    {
                        tracing::warn!(
                            domain = %result.domain,
                            %error,
                            "Failed to record candidate counts"
                        );
                    }
                }
                Err(error) => {
                    tracing::warn!(domain = %result.domain, %error, "Failed to register domain");
                }
            }

            tracing::debug!(
                domain = %result.domain,
                %confidence,
                is_candidate,
                "Result scored"
            );

            scored.push(ScoredResult {
                result,
                confidence,
                is_candidate,
            });
        }

        for result in outcome.spam {
            match self.registry.should_process(&result.domain).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(error) => {
                    tracing::warn!(domain = %result.domain, %error, "Blacklist check failed");
                    continue;
                }
            }

            let registration = match self.registry.register(&result.domain, session_id).await {
                Ok(registration) => registration,
                Err(error) => {
                    tracing::warn!(domain = %result.domain, %error, "Failed to register domain");
                    continue;
                }
            };
            if registration.newly_created {
                statistics.new_domains_discovered += 1;
            }

            if let Err(error) = self
                .registry
                .update_candidate_counts(&result.domain, 0, 1, Decimal::ZERO)
                .await
            {
                tracing::warn!(
                    domain = %result.domain,
                    %error,
                    "Failed to record low-quality observation"
                );
            }
        }

        scored
    }
}
