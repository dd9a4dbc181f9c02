//! In-memory session store for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{DiscoveryError, Result};
use crate::session::SessionStore;
use crate::types::{DiscoverySession, SessionStatistics, SessionStatus};

/// In-memory session store; data is lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, DiscoverySession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, id: Uuid) -> Result<DiscoverySession> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .entry(id)
            .or_insert_with(|| DiscoverySession::started(id));
        Ok(session.clone())
    }

    async fn finalize(
        &self,
        id: Uuid,
        status: SessionStatus,
        statistics: SessionStatistics,
        error_messages: Vec<String>,
    ) -> Result<DiscoverySession> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .get_mut(&id)
            .ok_or(DiscoveryError::SessionNotFound { id })?;

        if session.statistics.is_some() || session.status != SessionStatus::Running {
            return Err(DiscoveryError::SessionAlreadyFinalized { id });
        }

        session.status = status;
        session.completed_at = Some(Utc::now());
        session.statistics = Some(statistics);
        session.error_messages = error_messages;

        tracing::info!(session = %id, status = %session.status, "Session finalized");
        Ok(session.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<DiscoverySession>> {
        Ok(self.sessions.read().unwrap().get(&id).cloned())
    }
}
