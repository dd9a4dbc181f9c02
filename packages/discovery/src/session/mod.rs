//! Discovery session store.
//!
//! The orchestrator records each run's lifecycle here: Running at dispatch,
//! then Completed (full or partial success) or Failed, with the finalized
//! statistics attached exactly once.

mod memory;

#[cfg(feature = "postgres")]
mod postgres;

pub use memory::MemorySessionStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresSessionStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{DiscoverySession, SessionStatistics, SessionStatus};

/// Store for discovery session records.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get-or-create a running session record.
    async fn create(&self, id: Uuid) -> Result<DiscoverySession>;

    /// Attach the final status and statistics.
    ///
    /// Statistics are attached exactly once; finalizing an already-finalized
    /// session is an error.
    async fn finalize(
        &self,
        id: Uuid,
        status: SessionStatus,
        statistics: SessionStatistics,
        error_messages: Vec<String>,
    ) -> Result<DiscoverySession>;

    /// Look up a session by id.
    async fn get(&self, id: Uuid) -> Result<Option<DiscoverySession>>;
}
