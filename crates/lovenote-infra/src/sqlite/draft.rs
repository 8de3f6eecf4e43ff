//! SQLite implementation of `DraftStore`.
//!
//! One row per slot in the `drafts` table, upserted with INSERT OR REPLACE.

use chrono::Utc;
use lovenote_core::draft::DraftStore;
use lovenote_types::error::RepositoryError;
use sqlx::Row;

use super::format_datetime;
use super::pool::DatabasePool;

/// SQLite-backed draft slots.
pub struct SqliteDraftStore {
    pool: DatabasePool,
}

impl SqliteDraftStore {
    /// Create a new draft store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl DraftStore for SqliteDraftStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, RepositoryError> {
        let row = sqlx::query("SELECT value_json FROM drafts WHERE slot = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row
            .try_get("value_json")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let value = serde_json::from_str(&raw)
            .map_err(|e| RepositoryError::Query(format!("invalid draft JSON: {e}")))?;
        Ok(Some(value))
    }

    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), RepositoryError> {
        sqlx::query("INSERT OR REPLACE INTO drafts (slot, value_json, updated_at) VALUES (?, ?, ?)")
            .bind(key)
            .bind(value.to_string())
            .bind(format_datetime(&Utc::now()))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM drafts WHERE slot = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}
