//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends requests to `/v1beta/models/{model}:generateContent`. The API key
//! is wrapped in [`secrecy::SecretString`] and is only exposed when building
//! the request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use lovenote_core::llm::provider::LlmProvider;
use lovenote_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, StopReason, Usage,
};

use super::types::{
    GeminiContent, GeminiErrorBody, GeminiPart, GeminiRequest, GeminiResponse, GenerationConfig,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini text provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

// No Debug derive: keeps internal state out of logs.

impl GeminiProvider {
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| GeminiContent {
                role: Some(
                    match m.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction: request.system.as_ref().map(|s| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: s.clone() }],
            }),
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        }
    }
}

/// Map a non-success HTTP status and body to an [`LlmError`].
pub(crate) fn error_for_status(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<GeminiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        400 if message.contains("API key") => LlmError::AuthenticationFailed,
        400 => LlmError::InvalidRequest(message),
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

/// Convert a parsed Gemini response into the provider-agnostic shape.
pub(crate) fn into_completion(
    resp: GeminiResponse,
    requested_model: &str,
) -> Result<CompletionResponse, LlmError> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LlmError::Blocked(reason));
    }

    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Deserialization("response has no candidates".to_string()))?;

    let stop_reason = match candidate.finish_reason.as_deref() {
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
            StopReason::ContentFiltered
        }
        _ => StopReason::EndTurn,
    };

    let content: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if content.is_empty() && stop_reason == StopReason::ContentFiltered {
        return Err(LlmError::Blocked("candidate filtered".to_string()));
    }

    let usage = resp.usage_metadata.unwrap_or_default();
    Ok(CompletionResponse {
        content,
        model: resp.model_version.unwrap_or_else(|| requested_model.to_string()),
        stop_reason,
        usage: Usage {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        },
    })
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let body = Self::to_gemini_request(request);

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &error_body));
        }

        let gemini_resp: GeminiResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        into_completion(gemini_resp, model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lovenote_types::llm::Message;

    #[test]
    fn test_request_mapping() {
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("make it sweet")],
            system: Some("be kind".to_string()),
            max_tokens: 512,
            temperature: Some(0.9),
        };
        let body = GeminiProvider::to_gemini_request(&request);
        assert_eq!(body.contents[0].role.as_deref(), Some("user"));
        assert_eq!(body.contents[0].parts[0].text, "make it sweet");
        assert_eq!(body.system_instruction.unwrap().parts[0].text, "be kind");
        assert_eq!(body.generation_config.max_output_tokens, 512);
    }

    #[test]
    fn test_url_with_base_override() {
        let provider = GeminiProvider::new(SecretString::from("k"), "gemini-2.0-flash".to_string())
            .with_base_url("http://localhost:8080/".to_string());
        assert_eq!(
            provider.url(provider.model()),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(error_for_status(403, ""), LlmError::AuthenticationFailed));
        assert!(matches!(
            error_for_status(429, "slow down"),
            LlmError::RateLimited { .. }
        ));
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(error_for_status(400, body), LlmError::AuthenticationFailed));
        match error_for_status(500, "boom") {
            LlmError::Provider { message } => assert_eq!(message, "HTTP 500: boom"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_into_completion_joins_parts() {
        let resp: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hi "},{"text":"you"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        let completion = into_completion(resp, "gemini-2.0-flash").unwrap();
        assert_eq!(completion.content, "Hi you");
        assert_eq!(completion.model, "gemini-2.0-flash");
        assert_eq!(completion.stop_reason, StopReason::EndTurn);
    }

    #[test]
    fn test_into_completion_blocked() {
        let resp: GeminiResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(matches!(
            into_completion(resp, "m"),
            Err(LlmError::Blocked(reason)) if reason == "SAFETY"
        ));

        let resp: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(into_completion(resp, "m"), Err(LlmError::Deserialization(_))));
    }
}
