//! Text-generation provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined
//! in `lovenote-core`, and [`build_enhancer`], which turns the
//! `[enhancement]` config section into an optional message enhancer.
//!
//! [`LlmProvider`]: lovenote_core::llm::provider::LlmProvider

pub mod gemini;

use secrecy::SecretString;

use lovenote_core::wizard::LlmEnhancer;
use lovenote_types::config::EnhancementConfig;

use self::gemini::GeminiProvider;

/// The enhancer type every surface uses.
pub type GeminiEnhancer = LlmEnhancer<GeminiProvider>;

/// Build the enhancer, or `None` when it is switched off or no API key is
/// set in the configured environment variable.
pub fn build_enhancer(config: &EnhancementConfig) -> Option<GeminiEnhancer> {
    let key = std::env::var(&config.api_key_env).ok();
    build_enhancer_with_key(config, key)
}

fn build_enhancer_with_key(config: &EnhancementConfig, key: Option<String>) -> Option<GeminiEnhancer> {
    if !config.enabled {
        tracing::debug!("message enhancement disabled in config");
        return None;
    }
    let Some(key) = key.filter(|k| !k.trim().is_empty()) else {
        tracing::debug!(env = %config.api_key_env, "no enhancement API key set, enhancer off");
        return None;
    };

    let mut provider = GeminiProvider::new(SecretString::from(key), config.model.clone());
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    Some(LlmEnhancer::new(provider, config.model.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_has_no_enhancer() {
        let config = EnhancementConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(build_enhancer_with_key(&config, Some("key".to_string())).is_none());
    }

    #[test]
    fn test_missing_or_blank_key_has_no_enhancer() {
        let config = EnhancementConfig::default();
        assert!(build_enhancer_with_key(&config, None).is_none());
        assert!(build_enhancer_with_key(&config, Some("  ".to_string())).is_none());
    }

    #[test]
    fn test_key_present_builds_gemini_enhancer() {
        let config = EnhancementConfig::default();
        let enhancer = build_enhancer_with_key(&config, Some("secret".to_string())).unwrap();
        assert_eq!(enhancer.provider_name(), "gemini");
    }
}
