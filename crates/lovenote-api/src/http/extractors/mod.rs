//! Request extractors: admin API key auth, caller session and query params.

pub mod auth;
pub mod query;
pub mod session;
