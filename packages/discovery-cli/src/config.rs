//! CLI configuration loaded from environment variables.

use std::env;

use dotenvy::dotenv;

/// Provider credentials and storage settings.
///
/// Every provider is optional; whichever keys are present decide which
/// providers join the run.
#[derive(Debug, Clone)]
pub struct Config {
    pub brave_api_key: Option<String>,
    pub serper_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
    pub searxng_base_url: Option<String>,
    pub database_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        // Load .env file if present (development)
        let _ = dotenv();

        Self {
            brave_api_key: env::var("BRAVE_API_KEY").ok(),
            serper_api_key: env::var("SERPER_API_KEY").ok(),
            tavily_api_key: env::var("TAVILY_API_KEY").ok(),
            searxng_base_url: env::var("SEARXNG_BASE_URL").ok(),
            database_url: env::var("DATABASE_URL").ok(),
        }
    }

    /// True when at least one provider can be built.
    pub fn has_any_provider(&self) -> bool {
        self.brave_api_key.is_some()
            || self.serper_api_key.is_some()
            || self.tavily_api_key.is_some()
            || self.searxng_base_url.is_some()
    }
}
