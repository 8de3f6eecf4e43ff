//! LlmProvider trait definition.

use lovenote_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for text-generation backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in lovenote-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
