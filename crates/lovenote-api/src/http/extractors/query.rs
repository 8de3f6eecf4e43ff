//! Query parameter extractors for list endpoints.

use serde::Deserialize;

/// Query parameters for the public feed.
#[derive(Debug, Deserialize, Default)]
pub struct FeedQuery {
    /// Maximum results.
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

/// Query parameters for the admin listing.
#[derive(Debug, Deserialize, Default)]
pub struct AdminListQuery {
    /// Filter by status (pending, approved, rejected).
    pub status: Option<String>,
}
