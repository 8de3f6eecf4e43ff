//! SQLite reaction repository implementation.

use lovenote_core::repository::reaction::ReactionRepository;
use lovenote_types::confession::{ConfessionId, Reaction, ReactionType};
use lovenote_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ReactionRepository`.
pub struct SqliteReactionRepository {
    pool: DatabasePool,
}

impl SqliteReactionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn reaction_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Reaction, RepositoryError> {
    let query_err = |e: sqlx::Error| RepositoryError::Query(e.to_string());

    let id: String = row.try_get("id").map_err(query_err)?;
    let confession_id: String = row.try_get("confession_id").map_err(query_err)?;
    let reaction_type: String = row.try_get("reaction_type").map_err(query_err)?;
    let session_identifier: String = row.try_get("session_identifier").map_err(query_err)?;
    let created_at: String = row.try_get("created_at").map_err(query_err)?;

    Ok(Reaction {
        id: Uuid::parse_str(&id)
            .map_err(|e| RepositoryError::Query(format!("invalid reaction id: {e}")))?,
        confession_id: confession_id
            .parse::<ConfessionId>()
            .map_err(|e| RepositoryError::Query(format!("invalid confession id: {e}")))?,
        reaction_type: reaction_type
            .parse::<ReactionType>()
            .map_err(RepositoryError::Query)?,
        session_identifier,
        created_at: parse_datetime(&created_at)?,
    })
}

impl ReactionRepository for SqliteReactionRepository {
    async fn add(&self, reaction: &Reaction) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO confession_reactions (id, confession_id, reaction_type, session_identifier, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(reaction.id.to_string())
        .bind(reaction.confession_id.to_string())
        .bind(reaction.reaction_type.to_string())
        .bind(&reaction.session_identifier)
        .bind(format_datetime(&reaction.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_for_confession(
        &self,
        confession_id: &ConfessionId,
    ) -> Result<Vec<Reaction>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM confession_reactions WHERE confession_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(confession_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(reaction_from_row).collect()
    }
}
