//! Generative-text provider port.
//!
//! `LlmProvider` is the RPITIT trait concrete backends implement
//! (the Gemini client in lovenote-infra). The message enhancer is written
//! against it.

pub mod provider;
