//! Draft persistence.
//!
//! `DraftStore` is the port (JSON values under named slots). `Drafts` wraps
//! any store with the fail-soft read/write/clear contract every caller goes
//! through, and `DraftSlot` mirrors one typed value in memory with
//! write-through on every mutation.

pub mod memory;
pub mod store;

pub use memory::MemoryDraftStore;
pub use store::{DraftSlot, DraftStore, Drafts};

/// Slot holding the in-progress confession.
pub const CONFESSION_DRAFT_KEY: &str = "confession_draft";

/// Slot holding the local session identifier used for reactions.
pub const SESSION_ID_KEY: &str = "session_id";
