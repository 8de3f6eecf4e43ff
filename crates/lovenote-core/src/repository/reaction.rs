//! Reaction repository trait definition.

use lovenote_types::confession::{ConfessionId, Reaction};
use lovenote_types::error::RepositoryError;

/// Append-only storage for emoji reactions.
pub trait ReactionRepository: Send + Sync {
    /// Append a reaction. The store does not enforce uniqueness per session.
    fn add(
        &self,
        reaction: &Reaction,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All reactions on one confession, oldest first.
    fn list_for_confession(
        &self,
        confession_id: &ConfessionId,
    ) -> impl std::future::Future<Output = Result<Vec<Reaction>, RepositoryError>> + Send;
}
