//! Admin API key authentication extractor.
//!
//! Extracts and verifies API keys from:
//! - `Authorization: Bearer <key>` header
//! - `X-API-Key: <key>` header
//!
//! Keys are SHA-256 hashed and compared against the `api_keys` table.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::Row;

use lovenote_infra::sqlite::pool::DatabasePool;

use crate::http::error::AppError;
use crate::state::AppState;

/// Prefix of every generated admin key.
pub const API_KEY_PREFIX: &str = "lvn_";

/// Authenticated admin marker. Extracting this validates the API key.
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = extract_api_key(parts)?;
        let key_hash = hash_api_key(&api_key);

        let result = sqlx::query("SELECT id FROM api_keys WHERE key_hash = ?")
            .bind(&key_hash)
            .fetch_optional(&state.db_pool.reader)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;

        match result {
            Some(row) => {
                // Best effort; a failed timestamp update does not fail the request.
                let id: String = row.get("id");
                let now = chrono::Utc::now().to_rfc3339();
                let _ = sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE id = ?")
                    .bind(&now)
                    .bind(&id)
                    .execute(&state.db_pool.writer)
                    .await;
                Ok(AdminAuth)
            }
            None => Err(AppError::Unauthorized(
                "Invalid API key. Provide a valid key via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
            )),
        }
    }
}

/// Extract the API key from request headers.
fn extract_api_key(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(key) = auth_str.strip_prefix("Bearer ") {
            return Ok(key.trim().to_string());
        }
    }

    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(key_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing API key. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
    ))
}

/// Compute SHA-256 hash of an API key (lowercase hex).
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)
}

/// Generate a new admin key named `name` and store its hash.
///
/// Returns the plaintext key; it is never stored and cannot be shown again.
pub async fn issue_api_key(pool: &DatabasePool, name: &str) -> anyhow::Result<String> {
    let mut key_bytes = [0u8; 32];
    rand::rng().fill(&mut key_bytes);
    let plaintext_key = format!(
        "{API_KEY_PREFIX}{}",
        key_bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
    );

    let id = uuid::Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO api_keys (id, key_hash, name, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(hash_api_key(&plaintext_key))
        .bind(name)
        .bind(&now)
        .execute(&pool.writer)
        .await?;

    tracing::info!(key_id = %id, name, "admin API key issued");
    Ok(plaintext_key)
}

/// Issue the first admin key if none exists yet.
///
/// Returns `Some(key)` only when a key was created by this call.
pub async fn ensure_api_key(pool: &DatabasePool) -> anyhow::Result<Option<String>> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM api_keys LIMIT 1")
        .fetch_optional(&pool.reader)
        .await?;

    if existing.is_some() {
        return Ok(None);
    }
    issue_api_key(pool, "default").await.map(Some)
}
