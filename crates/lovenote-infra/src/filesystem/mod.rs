//! Data directory layout for Lovenote.
//!
//! Everything local lives under one directory: `lovenote.db` (confessions,
//! reactions, drafts, API keys) and `config.toml`.

use std::path::{Path, PathBuf};

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `LOVENOTE_DATA_DIR` environment variable
/// 2. `~/.lovenote` under the user's home directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LOVENOTE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".lovenote");
    }

    // Last resort: current directory
    PathBuf::from(".lovenote")
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}

/// Path of the configuration file inside `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}
