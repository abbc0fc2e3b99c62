mod config;

pub use config::{Config, CuesConfig, DisplayConfig, SessionDefaults};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/respir[-dev]/` based on RESPIR_ENV.
///
/// Set RESPIR_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RESPIR_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("respir-dev")
    } else {
        base_dir.join("respir")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
