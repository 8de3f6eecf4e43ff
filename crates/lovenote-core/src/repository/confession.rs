//! Confession repository trait definition.

use lovenote_types::confession::{
    Confession, ConfessionId, ConfessionStatistics, ConfessionStatus, NewConfession,
};
use lovenote_types::error::RepositoryError;

use super::SortOrder;

/// Filter criteria for listing confessions. Results are ordered by
/// `created_at`.
#[derive(Debug, Clone, Default)]
pub struct ConfessionFilter {
    /// Only confessions in this moderation state.
    pub status: Option<ConfessionStatus>,
    /// Exact college name.
    pub college_name: Option<String>,
    /// Exact department.
    pub department: Option<String>,
    /// Sort direction on `created_at` (default newest first).
    pub sort_order: Option<SortOrder>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip (offset pagination).
    pub offset: Option<i64>,
}

/// Repository trait for confession persistence.
///
/// Implementations live in lovenote-infra (e.g., SqliteConfessionRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait ConfessionRepository: Send + Sync {
    /// Insert a new confession. A taken `unique_code` yields
    /// `RepositoryError::Conflict`.
    fn create(
        &self,
        confession: &NewConfession,
    ) -> impl std::future::Future<Output = Result<Confession, RepositoryError>> + Send;

    /// Look up by retrieval code (exact, case-sensitive).
    fn get_by_code(
        &self,
        code: &str,
    ) -> impl std::future::Future<Output = Result<Option<Confession>, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &ConfessionId,
    ) -> impl std::future::Future<Output = Result<Option<Confession>, RepositoryError>> + Send;

    /// List confessions with optional filtering, sorting, and pagination.
    fn list(
        &self,
        filter: Option<ConfessionFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<Confession>, RepositoryError>> + Send;

    /// Move a confession to `status`. `RepositoryError::NotFound` for an
    /// unknown id.
    fn update_status(
        &self,
        id: &ConfessionId,
        status: ConfessionStatus,
    ) -> impl std::future::Future<Output = Result<Confession, RepositoryError>> + Send;

    /// Atomically add one to the view counter.
    fn increment_views(
        &self,
        id: &ConfessionId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Totals across all confessions and reactions.
    fn statistics(
        &self,
    ) -> impl std::future::Future<Output = Result<ConfessionStatistics, RepositoryError>> + Send;
}
