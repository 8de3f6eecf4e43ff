//! Configuration types for Lovenote.
//!
//! `LovenoteConfig` represents the `config.toml` in the data directory that
//! controls the delivery date, the admin panel, the optional message
//! enhancer, and wizard timing.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.lovenote/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LovenoteConfig {
    /// Display name used in CLI banners and the health endpoint.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// When confessions are "delivered" (countdown target).
    #[serde(default = "default_delivery_date")]
    pub delivery_date: DateTime<Utc>,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub enhancement: EnhancementConfig,

    #[serde(default)]
    pub wizard: WizardConfig,
}

fn default_app_name() -> String {
    "Valentine's Confessions".to_string()
}

fn default_delivery_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 14, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

impl Default for LovenoteConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            delivery_date: default_delivery_date(),
            admin: AdminConfig::default(),
            enhancement: EnhancementConfig::default(),
            wizard: WizardConfig::default(),
        }
    }
}

/// Admin panel switch. Admin routes are not mounted when disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Optional generative rewrite of the submitted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementConfig {
    /// Master switch. Even when true the enhancer stays off if no API key
    /// is found in `api_key_env`.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_enhancement_model")]
    pub model: String,

    /// Environment variable holding the provider API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Override for the provider endpoint (proxies, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Upper bound on one enhancement call.
    #[serde(default = "default_enhancement_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_enhancement_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_enhancement_timeout_secs() -> u64 {
    15
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            model: default_enhancement_model(),
            api_key_env: default_api_key_env(),
            base_url: None,
            timeout_secs: default_enhancement_timeout_secs(),
        }
    }
}

/// Wizard timing knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Delay between a successful submission and the redirect to the
    /// confession page.
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,

    /// HTTP wizards untouched for this long are dropped. Their saved
    /// drafts stay in the store.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Most HTTP wizards held open at once; the least recently used one
    /// is dropped to make room.
    #[serde(default = "default_max_open")]
    pub max_open: usize,
}

fn default_redirect_delay_ms() -> u64 {
    2_000
}

fn default_idle_timeout_secs() -> u64 {
    30 * 60
}

fn default_max_open() -> usize {
    1_000
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: default_redirect_delay_ms(),
            idle_timeout_secs: default_idle_timeout_secs(),
            max_open: default_max_open(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = LovenoteConfig::default();
        assert_eq!(config.app_name, "Valentine's Confessions");
        assert_eq!(config.delivery_date.to_rfc3339(), "2026-02-14T00:00:00+00:00");
        assert!(!config.admin.enabled);
        assert!(config.enhancement.enabled);
        assert_eq!(config.enhancement.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.enhancement.timeout_secs, 15);
        assert_eq!(config.wizard.redirect_delay_ms, 2_000);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: LovenoteConfig = toml::from_str("").unwrap();
        assert_eq!(config, LovenoteConfig::default());
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
app_name = "Campus Crushes"
delivery_date = "2027-02-14T09:00:00Z"

[admin]
enabled = true

[enhancement]
enabled = false
model = "gemini-2.5-flash"
timeout_secs = 5

[wizard]
redirect_delay_ms = 500
"#;
        let config: LovenoteConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.app_name, "Campus Crushes");
        assert_eq!(config.delivery_date.to_rfc3339(), "2027-02-14T09:00:00+00:00");
        assert!(config.admin.enabled);
        assert!(!config.enhancement.enabled);
        assert_eq!(config.enhancement.model, "gemini-2.5-flash");
        // Unspecified fields keep their defaults
        assert_eq!(config.enhancement.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.enhancement.timeout_secs, 5);
        assert_eq!(config.wizard.redirect_delay_ms, 500);
        assert_eq!(config.wizard.idle_timeout_secs, 1_800);
        assert_eq!(config.wizard.max_open, 1_000);
    }
}
