//! PostgreSQL session store.
//!
//! Production backend for session records. Finalization is a single
//! conditional UPDATE guarded on the RUNNING status, so statistics are
//! attached exactly once even when two orchestrations race on one id.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use crate::error::{DiscoveryError, Result};
use crate::session::SessionStore;
use crate::types::{DiscoverySession, SessionStatistics, SessionStatus};

/// PostgreSQL-backed session store.
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Connect and ensure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(storage_err)?;

        Self::from_pool(pool).await
    }

    /// Reuse an existing connection pool (e.g. the registry's) and ensure
    /// the schema exists.
    pub async fn from_pool(pool: PgPool) -> Result<Self> {
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS discovery_sessions (
                id UUID PRIMARY KEY,
                status TEXT NOT NULL,
                started_at TIMESTAMPTZ NOT NULL,
                completed_at TIMESTAMPTZ,
                statistics JSONB,
                error_messages TEXT[] NOT NULL DEFAULT '{}'
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn create(&self, id: Uuid) -> Result<DiscoverySession> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO discovery_sessions (id, status, started_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(SessionStatus::Running.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        if let Some(row) = inserted {
            return row_to_session(&row);
        }

        let existing = sqlx::query("SELECT * FROM discovery_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?
            .ok_or(DiscoveryError::SessionNotFound { id })?;

        row_to_session(&existing)
    }

    async fn finalize(
        &self,
        id: Uuid,
        status: SessionStatus,
        statistics: SessionStatistics,
        error_messages: Vec<String>,
    ) -> Result<DiscoverySession> {
        let statistics =
            serde_json::to_value(&statistics).map_err(|e| DiscoveryError::Storage(Box::new(e)))?;

        // The RUNNING guard makes finalization first-writer-wins.
        let row = sqlx::query(
            r#"
            UPDATE discovery_sessions SET
                status = $2,
                completed_at = $3,
                statistics = $4,
                error_messages = $5
            WHERE id = $1 AND status = 'RUNNING' AND statistics IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(&statistics)
        .bind(&error_messages)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        let Some(row) = row else {
            let exists = sqlx::query("SELECT 1 FROM discovery_sessions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_err)?;

            return Err(match exists {
                Some(_) => DiscoveryError::SessionAlreadyFinalized { id },
                None => DiscoveryError::SessionNotFound { id },
            });
        };

        let session = row_to_session(&row)?;
        tracing::info!(session = %id, status = %session.status, "Session finalized");
        Ok(session)
    }

    async fn get(&self, id: Uuid) -> Result<Option<DiscoverySession>> {
        let row = sqlx::query("SELECT * FROM discovery_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        row.map(|r| row_to_session(&r)).transpose()
    }
}

fn storage_err(error: sqlx::Error) -> DiscoveryError {
    DiscoveryError::Storage(Box::new(error))
}

fn row_to_session(row: &PgRow) -> Result<DiscoverySession> {
    let status_text: String = row.get("status");
    let status = SessionStatus::parse(&status_text).ok_or_else(|| {
        DiscoveryError::Storage(format!("unknown session status: {status_text}").into())
    })?;

    let statistics = row
        .get::<Option<serde_json::Value>, _>("statistics")
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| DiscoveryError::Storage(Box::new(e)))?;

    Ok(DiscoverySession {
        id: row.get("id"),
        status,
        started_at: row.get("started_at"),
        completed_at: row.get("completed_at"),
        statistics,
        error_messages: row.get("error_messages"),
    })
}
