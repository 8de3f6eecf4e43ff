//! Shared domain types for Lovenote.
//!
//! Confessions, drafts, wizard steps, reactions, configuration and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod confession;
pub mod draft;
pub mod error;
pub mod llm;
pub mod music;
pub mod wizard;

/// Longest accepted confession message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 1000;
/// Shortest accepted confession message, in characters.
pub const MIN_MESSAGE_LENGTH: usize = 10;
/// Longest recipient hint, in characters.
pub const MAX_HINT_LENGTH: usize = 200;
/// Longest additional message, in characters.
pub const MAX_ADDITIONAL_MESSAGE_LENGTH: usize = 200;
