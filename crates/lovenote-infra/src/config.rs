//! Configuration loader for Lovenote.
//!
//! Reads `config.toml` from the data directory (`~/.lovenote/` in production)
//! and deserializes it into [`LovenoteConfig`]. Falls back to sensible
//! defaults when the file is missing or malformed.

use std::path::Path;

use lovenote_types::config::LovenoteConfig;

use crate::filesystem::config_path;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`LovenoteConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> LovenoteConfig {
    let config_path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return LovenoteConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return LovenoteConfig::default();
        }
    };

    match toml::from_str::<LovenoteConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            LovenoteConfig::default()
        }
    }
}
