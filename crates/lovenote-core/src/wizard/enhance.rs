//! Optional rewrite of the confession message by a text-generation service.

use std::future::Future;

use lovenote_types::MAX_MESSAGE_LENGTH;
use lovenote_types::confession::Mood;
use lovenote_types::draft::ConfessionDraft;
use lovenote_types::error::EnhanceError;
use lovenote_types::llm::{CompletionRequest, Message};

use crate::llm::provider::LlmProvider;

/// Capability that turns a draft into an enhanced message text.
///
/// The wizard treats a missing enhancer exactly like one that returned the
/// message unchanged.
pub trait Enhancer: Send + Sync {
    fn enhance(
        &self,
        draft: &ConfessionDraft,
    ) -> impl Future<Output = Result<String, EnhanceError>> + Send;
}

/// Placeholder for wizards built without an enhancer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnhancer;

impl Enhancer for NoEnhancer {
    async fn enhance(&self, _draft: &ConfessionDraft) -> Result<String, EnhanceError> {
        Err(EnhanceError::Unavailable)
    }
}

/// Enhancer backed by an [`LlmProvider`].
pub struct LlmEnhancer<P: LlmProvider> {
    provider: P,
    model: String,
}

impl<P: LlmProvider> LlmEnhancer<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

impl<P: LlmProvider> Enhancer for LlmEnhancer<P> {
    async fn enhance(&self, draft: &ConfessionDraft) -> Result<String, EnhanceError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user(build_enhancement_prompt(draft))],
            system: None,
            max_tokens: 1024,
            temperature: Some(0.9),
        };

        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| EnhanceError::Provider(e.to_string()))?;

        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            output_tokens = response.usage.output_tokens,
            "enhancement completed"
        );

        clean_enhanced_text(&response.content)
    }
}

/// Prompt sent to the provider for one draft.
pub fn build_enhancement_prompt(draft: &ConfessionDraft) -> String {
    let mood = draft.mood.unwrap_or(Mood::Sweet);
    let message = draft.message.as_deref().unwrap_or_default();
    let college = draft.college_name.as_deref().unwrap_or_default();
    let department = draft.department.as_deref().unwrap_or("N/A");
    let year = draft.year_or_batch.map(|y| y.label()).unwrap_or_default();
    let hint = draft
        .recipient_hint
        .as_deref()
        .map(|h| format!("Hints about recipient: {h}\n"))
        .unwrap_or_default();

    format!(
        "You are a romantic Valentine's Day confession writer. Transform the following \
confession into a beautiful, heartfelt message while keeping the original sentiment and tone.

Original Message: \"{message}\"
Mood: {mood}
College: {college}
Department: {department}
Year: {year}
{hint}
Guidelines:
- Keep it genuine and heartfelt
- Maintain the {mood} mood
- Make it romantic but not overly dramatic
- Keep it under 800 characters
- Don't use overly complex vocabulary
- Make it feel personal and sincere
- DO NOT add quotes around the message
- Return ONLY the enhanced message, nothing else

Enhanced confession:"
    )
}

/// Trim, drop one pair of wrapping quotes, cap to the message limit.
pub fn clean_enhanced_text(raw: &str) -> Result<String, EnhanceError> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    let trimmed = trimmed
        .strip_suffix(['"', '\''])
        .unwrap_or(trimmed)
        .trim();

    if trimmed.is_empty() {
        return Err(EnhanceError::EmptyResponse);
    }
    Ok(trimmed.chars().take(MAX_MESSAGE_LENGTH).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lovenote_types::confession::YearOrBatch;
    use lovenote_types::llm::{CompletionResponse, LlmError, StopReason, Usage};

    struct CannedProvider {
        reply: Result<String, ()>,
    }

    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    content: text.clone(),
                    model: request.model.clone(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                Err(()) => Err(LlmError::RateLimited {
                    retry_after_ms: None,
                }),
            }
        }
    }

    fn draft() -> ConfessionDraft {
        ConfessionDraft {
            message: Some("I think about you every lecture".to_string()),
            college_name: Some("MIT".to_string()),
            year_or_batch: Some(YearOrBatch::Second),
            recipient_hint: Some("sits by the window".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_prompt_defaults_and_hint() {
        let prompt = build_enhancement_prompt(&draft());
        assert!(prompt.contains("Original Message: \"I think about you every lecture\""));
        assert!(prompt.contains("Mood: sweet"));
        assert!(prompt.contains("Department: N/A"));
        assert!(prompt.contains("Year: 2nd Year"));
        assert!(prompt.contains("Hints about recipient: sits by the window"));
    }

    #[test]
    fn test_clean_strips_wrapping_quotes() {
        assert_eq!(clean_enhanced_text("  \"Hello there\"\n").unwrap(), "Hello there");
        assert_eq!(clean_enhanced_text("'Hi'").unwrap(), "Hi");
        assert_eq!(clean_enhanced_text("It's \"ours\" now").unwrap(), "It's \"ours\" now");
    }

    #[test]
    fn test_clean_rejects_empty_and_caps_length() {
        assert!(matches!(clean_enhanced_text(" \"\" "), Err(EnhanceError::EmptyResponse)));
        let long = "a".repeat(1500);
        assert_eq!(clean_enhanced_text(&long).unwrap().chars().count(), 1000);
    }

    #[tokio::test]
    async fn test_llm_enhancer_success_and_failure() {
        let ok = LlmEnhancer::new(
            CannedProvider {
                reply: Ok("\"Every lecture, my eyes find you.\"".to_string()),
            },
            "test-model",
        );
        assert_eq!(ok.enhance(&draft()).await.unwrap(), "Every lecture, my eyes find you.");

        let failing = LlmEnhancer::new(CannedProvider { reply: Err(()) }, "test-model");
        assert!(matches!(
            failing.enhance(&draft()).await,
            Err(EnhanceError::Provider(_))
        ));
    }
}
