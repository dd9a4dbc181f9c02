//! Run one funding-discovery session from the command line.
//!
//! Builds whichever providers have credentials in the environment, executes
//! a multi-provider search, and prints the session statistics and the
//! candidates that cleared the confidence gate.

mod config;

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use discovery::{
    BraveProvider, DomainRegistry, MemoryRegistry, MemorySessionStore, PostgresRegistry,
    PostgresSessionStore, SearchOrchestrator, SearchProvider, SearxngProvider, SerperProvider,
    SessionStore, TavilyProvider,
};

use config::Config;

#[derive(Parser)]
#[command(name = "discover")]
#[command(about = "Run one multi-provider funding-discovery session")]
struct Cli {
    /// Keyword query sent to classic search providers.
    #[arg(long, default_value = "education grants Bulgaria")]
    keyword_query: String,

    /// AI-optimized query sent to AI-style providers.
    #[arg(long, default_value = "funding opportunities for Bulgarian education nonprofits")]
    ai_query: String,

    /// Maximum results requested per provider.
    #[arg(long, default_value_t = 10)]
    max_results: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    if !config.has_any_provider() {
        bail!(
            "no search providers configured; set at least one of BRAVE_API_KEY, \
             SERPER_API_KEY, TAVILY_API_KEY, SEARXNG_BASE_URL"
        );
    }

    let (registry, sessions): (Arc<dyn DomainRegistry>, Arc<dyn SessionStore>) =
        match &config.database_url {
            Some(url) => {
                tracing::info!("Using PostgreSQL registry and session store");
                let registry = PostgresRegistry::connect(url).await?;
                let sessions = PostgresSessionStore::from_pool(registry.pool().clone()).await?;
                (Arc::new(registry), Arc::new(sessions))
            }
            None => {
                tracing::info!("DATABASE_URL not set; using in-memory stores");
                (
                    Arc::new(MemoryRegistry::new()),
                    Arc::new(MemorySessionStore::new()),
                )
            }
        };

    let mut orchestrator = SearchOrchestrator::new(registry, sessions);
    for provider in build_providers(&config) {
        orchestrator = orchestrator.with_provider(provider);
    }

    let session_id = Uuid::new_v4();
    let outcome = orchestrator
        .execute_multi_provider_search(
            &cli.keyword_query,
            &cli.ai_query,
            cli.max_results,
            session_id,
        )
        .await?;

    println!("Session {session_id}");
    println!("  raw results:         {}", outcome.statistics.total_raw_results());
    for (provider, count) in &outcome.statistics.results_by_provider {
        println!("    {provider}: {count}");
    }
    println!("  surviving results:   {}", outcome.statistics.total_results_found);
    println!("  filtered (spam+dup): {}", outcome.statistics.spam_results_filtered);
    println!("  new domains:         {}", outcome.statistics.new_domains_discovered);
    println!("  known domains:       {}", outcome.statistics.duplicate_domains_skipped);

    if !outcome.provider_errors.is_empty() {
        println!("  provider errors:");
        for error in &outcome.provider_errors {
            println!("    {} [{:?}]: {}", error.provider, error.kind, error.message);
        }
    }

    println!();
    println!("Candidates (confidence >= 0.60):");
    for candidate in outcome.candidates() {
        println!(
            "  {:>5}  {}  {}",
            candidate.confidence,
            candidate.result.domain,
            candidate.result.url
        );
    }

    Ok(())
}

/// Build providers for whichever credentials are present.
///
/// Registration order fixes the aggregation tie-break order.
fn build_providers(config: &Config) -> Vec<Arc<dyn SearchProvider>> {
    let mut providers: Vec<Arc<dyn SearchProvider>> = Vec::new();

    if let Some(key) = &config.brave_api_key {
        providers.push(Arc::new(BraveProvider::new(key.clone())));
    }
    if let Some(base_url) = &config.searxng_base_url {
        providers.push(Arc::new(SearxngProvider::new(base_url.clone())));
    }
    if let Some(key) = &config.serper_api_key {
        providers.push(Arc::new(SerperProvider::new(key.clone())));
    }
    if let Some(key) = &config.tavily_api_key {
        providers.push(Arc::new(TavilyProvider::new(key.clone())));
    }

    providers
}
