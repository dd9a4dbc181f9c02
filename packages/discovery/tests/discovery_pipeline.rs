//! Integration tests for the full discovery pipeline.
//!
//! These tests drive the complete workflow:
//! 1. Concurrent multi-provider search with mixed query styles
//! 2. Anti-spam filtering and domain deduplication
//! 3. Confidence scoring and candidate gating
//! 4. Domain registry memory across sessions
//! 5. Session statistics and lifecycle

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use discovery::{
    DomainRegistry, DomainStatus, MemoryRegistry, MemorySessionStore, MockSearchProvider,
    ProviderKind, QueryStyle, SearchOrchestrator, SessionStatus, SessionStore,
};

const KEYWORD_QUERY: &str = "education grants Bulgaria";
const AI_QUERY: &str = "funding opportunities for Bulgarian education nonprofits";

struct TestEnv {
    registry: Arc<MemoryRegistry>,
    sessions: Arc<MemorySessionStore>,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            registry: Arc::new(MemoryRegistry::new()),
            sessions: Arc::new(MemorySessionStore::new()),
        }
    }

    /// Four providers with a realistic mix of hits: a strong government
    /// candidate reported by two providers, a cross-category spam page, a
    /// spam-TLD page that survives filtering but scores low, and a strong
    /// foundation candidate from the AI-style provider.
    fn orchestrator(&self) -> SearchOrchestrator {
        let brave = MockSearchProvider::new(ProviderKind::Brave, QueryStyle::Keyword).with_hits(
            KEYWORD_QUERY,
            &[
                (
                    "https://ministry.gov.bg/grants",
                    "Education Grants from the Ministry",
                    "Funding for Bulgarian students",
                ),
                (
                    "https://casino.com/scholarships",
                    "Scholarships Grants Funding",
                    "Education Financial Aid",
                ),
            ],
        );

        let searxng = MockSearchProvider::new(ProviderKind::Searxng, QueryStyle::Keyword)
            .with_hits(
                KEYWORD_QUERY,
                &[
                    (
                        "https://education-grants.org/bulgaria",
                        "Education Grants for Bulgaria",
                        "Foundation grant programmes for local schools in the region",
                    ),
                    (
                        "https://ministry.gov.bg/programs/2025",
                        "Ministry Grant Programmes",
                        "State funding for education in Bulgaria",
                    ),
                ],
            );

        let serper = MockSearchProvider::new(ProviderKind::Serper, QueryStyle::Keyword).with_hits(
            KEYWORD_QUERY,
            &[(
                "https://grants.xyz/apply",
                "Free grants for everyone",
                "Apply now to win easy money grants",
            )],
        );

        let tavily = MockSearchProvider::new(ProviderKind::Tavily, QueryStyle::AiOptimized)
            .with_hits(
                AI_QUERY,
                &[(
                    "https://us-bulgaria.org/programs",
                    "Grant Programs in Bulgaria",
                    "Scholarship funding from the US-Bulgaria foundation",
                )],
            );

        SearchOrchestrator::new(
            Arc::clone(&self.registry) as Arc<dyn DomainRegistry>,
            Arc::clone(&self.sessions) as Arc<dyn SessionStore>,
        )
        .with_provider(Arc::new(brave))
        .with_provider(Arc::new(searxng))
        .with_provider(Arc::new(serper))
        .with_provider(Arc::new(tavily))
    }
}

#[tokio::test]
async fn test_full_discovery_run() {
    let env = TestEnv::new();
    let session_id = Uuid::new_v4();

    let outcome = env
        .orchestrator()
        .execute_multi_provider_search(KEYWORD_QUERY, AI_QUERY, 10, session_id)
        .await
        .unwrap();

    assert!(outcome.is_full_success());

    // 6 raw results; the casino page is spam and the duplicate ministry hit
    // folds into the best-ranked one.
    assert_eq!(outcome.statistics.total_raw_results(), 6);
    assert_eq!(outcome.results.len(), 4);
    assert_eq!(outcome.statistics.total_results_found, 4);
    assert_eq!(outcome.statistics.spam_results_filtered, 2);

    let domains: Vec<&str> = outcome
        .results
        .iter()
        .map(|r| r.result.domain.as_str())
        .collect();
    assert!(domains.contains(&"ministry.gov.bg"));
    assert!(domains.contains(&"education-grants.org"));
    assert!(domains.contains(&"grants.xyz"));
    assert!(domains.contains(&"us-bulgaria.org"));

    // The ministry domain keeps its best (rank 1) hit.
    let ministry = outcome
        .results
        .iter()
        .find(|r| r.result.domain == "ministry.gov.bg")
        .unwrap();
    assert_eq!(ministry.result.rank_position, 1);
    assert_eq!(ministry.result.provider, ProviderKind::Brave);
    assert_eq!(ministry.confidence, Decimal::new(90, 2));
    assert!(ministry.is_candidate);

    // The spam-TLD page survives filtering but scores below the gate.
    let xyz = outcome
        .results
        .iter()
        .find(|r| r.result.domain == "grants.xyz")
        .unwrap();
    assert!(!xyz.is_candidate);

    assert_eq!(outcome.candidates().count(), 3);

    // Registry state after the pass.
    let ministry_record = env
        .registry
        .find("ministry.gov.bg")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ministry_record.status, DomainStatus::ProcessedHighQuality);
    assert_eq!(ministry_record.high_quality_candidate_count, 1);
    assert_eq!(
        ministry_record.best_confidence_score,
        Some(Decimal::new(90, 2))
    );

    let casino_record = env.registry.find("casino.com").await.unwrap().unwrap();
    assert_eq!(casino_record.status, DomainStatus::ProcessedLowQuality);
    assert_eq!(casino_record.low_quality_candidate_count, 1);

    // Session record finalized with the statistics attached.
    let session = env.sessions.get(session_id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.statistics, Some(outcome.statistics.clone()));
    assert!(session.completed_at.is_some());
}

#[tokio::test]
async fn test_registry_remembers_domains_across_sessions() {
    let env = TestEnv::new();

    let first = env
        .orchestrator()
        .execute_multi_provider_search(KEYWORD_QUERY, AI_QUERY, 10, Uuid::new_v4())
        .await
        .unwrap();
    // All domains are new in the first pass (including the spam domain).
    assert_eq!(first.statistics.new_domains_discovered, 5);
    assert_eq!(first.statistics.duplicate_domains_skipped, 0);

    let second = env
        .orchestrator()
        .execute_multi_provider_search(KEYWORD_QUERY, AI_QUERY, 10, Uuid::new_v4())
        .await
        .unwrap();

    // Same results, but every surviving domain is now a known duplicate.
    assert_eq!(second.statistics.new_domains_discovered, 0);
    assert_eq!(second.statistics.duplicate_domains_skipped, 4);

    // Quality counters accumulate; the best score is a running max.
    let ministry = env
        .registry
        .find("ministry.gov.bg")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ministry.high_quality_candidate_count, 2);
    assert_eq!(ministry.processing_count, 2);
    assert_eq!(ministry.best_confidence_score, Some(Decimal::new(90, 2)));
}

#[tokio::test]
async fn test_blacklisted_domain_stays_excluded() {
    let env = TestEnv::new();
    let admin = Uuid::new_v4();

    env.orchestrator()
        .execute_multi_provider_search(KEYWORD_QUERY, AI_QUERY, 10, Uuid::new_v4())
        .await
        .unwrap();

    env.registry
        .blacklist("grants.xyz", admin, "Irrelevant to Eastern Europe")
        .await
        .unwrap();

    let outcome = env
        .orchestrator()
        .execute_multi_provider_search(KEYWORD_QUERY, AI_QUERY, 10, Uuid::new_v4())
        .await
        .unwrap();

    let domains: Vec<&str> = outcome
        .results
        .iter()
        .map(|r| r.result.domain.as_str())
        .collect();
    assert!(!domains.contains(&"grants.xyz"));
    assert_eq!(outcome.results.len(), 3);

    // Blacklist survives with its audit trail; counters stay frozen.
    let record = env.registry.find("grants.xyz").await.unwrap().unwrap();
    assert_eq!(record.status, DomainStatus::Blacklisted);
    assert_eq!(record.blacklisted_by, Some(admin));
    assert_eq!(record.low_quality_candidate_count, 1);
    assert!(!env.registry.should_process("grants.xyz").await.unwrap());
}

#[tokio::test]
async fn test_failed_domains_surface_for_retry() {
    let env = TestEnv::new();
    let session_id = Uuid::new_v4();

    env.orchestrator()
        .execute_multi_provider_search(KEYWORD_QUERY, AI_QUERY, 10, session_id)
        .await
        .unwrap();

    env.registry
        .record_processing_failure("us-bulgaria.org", "SSL certificate error")
        .await
        .unwrap();

    // Still processable by the pipeline (only blacklist blocks), but the
    // retry queue respects the backoff.
    assert!(env.registry.should_process("us-bulgaria.org").await.unwrap());

    let now = chrono::Utc::now();
    assert!(env.registry.ready_for_retry(now).await.unwrap().is_empty());

    let after_backoff = now + chrono::TimeDelta::minutes(61);
    let ready = env.registry.ready_for_retry(after_backoff).await.unwrap();
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].domain_name, "us-bulgaria.org");
    assert_eq!(ready[0].failure_reason.as_deref(), Some("SSL certificate error"));
}
