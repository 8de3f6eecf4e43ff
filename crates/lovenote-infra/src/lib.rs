//! Infrastructure layer for Lovenote.
//!
//! Contains implementations of the ports defined in `lovenote-core`:
//! SQLite repositories and draft store, the Gemini text provider, the
//! `config.toml` loader and data-directory resolution.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
