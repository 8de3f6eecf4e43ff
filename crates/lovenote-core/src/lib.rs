//! Business logic and repository trait definitions for Lovenote.
//!
//! This crate defines the "ports" (repository, draft store and provider
//! traits) that the infrastructure layer implements, plus the submission
//! wizard and the confession service. It depends only on `lovenote-types`
//! -- never on `lovenote-infra` or any database/IO crate.

pub mod code;
pub mod countdown;
pub mod draft;
pub mod llm;
pub mod music;
pub mod repository;
pub mod service;
pub mod session;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;
