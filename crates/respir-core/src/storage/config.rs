//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default session durations used when the CLI is given no flags
//! - Whether cues play
//! - Phase labels shown by the terminal display
//!
//! Configuration is stored at `~/.config/respir/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::SessionConfig;

/// Default session durations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default = "default_total_minutes")]
    pub total_minutes: u32,
    #[serde(default = "default_phase1_seconds")]
    pub phase1_seconds: u32,
    #[serde(default = "default_phase2_seconds")]
    pub phase2_seconds: u32,
}

/// Cue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_phase1_label")]
    pub phase1_label: String,
    #[serde(default = "default_phase2_label")]
    pub phase2_label: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/respir/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionDefaults,
    #[serde(default)]
    pub cues: CuesConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

// Default functions
fn default_total_minutes() -> u32 {
    5
}
fn default_phase1_seconds() -> u32 {
    4
}
fn default_phase2_seconds() -> u32 {
    6
}
fn default_true() -> bool {
    true
}
fn default_phase1_label() -> String {
    "Inhale".into()
}
fn default_phase2_label() -> String {
    "Exhale".into()
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            total_minutes: default_total_minutes(),
            phase1_seconds: default_phase1_seconds(),
            phase2_seconds: default_phase2_seconds(),
        }
    }
}

impl Default for CuesConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            phase1_label: default_phase1_label(),
            phase2_label: default_phase2_label(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u32>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?
                    .into(),
            ),
            serde_json::Value::Object(_) => return Err(unknown()),
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing the defaults there if nothing exists yet.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the key's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Session durations from the `[session]` section.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(
            self.session.total_minutes,
            self.session.phase1_seconds,
            self.session.phase2_seconds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.session_config(), SessionConfig::new(5, 4, 6));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[session]\ntotal_minutes = 2\n").unwrap();
        assert_eq!(parsed.session.total_minutes, 2);
        assert_eq!(parsed.session.phase1_seconds, 4);
        assert!(parsed.cues.enabled);
        assert_eq!(parsed.display.phase2_label, "Exhale");
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.phase2_seconds").as_deref(), Some("6"));
        assert_eq!(cfg.get("display.phase1_label").as_deref(), Some("Inhale"));
        assert_eq!(cfg.get("cues.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("session"), None);
        assert_eq!(cfg.get("nope"), None);
    }

    #[test]
    fn apply_checks_types() {
        let mut cfg = Config::default();
        cfg.apply("session.total_minutes", "12").unwrap();
        cfg.apply("cues.enabled", "false").unwrap();
        cfg.apply("display.phase1_label", "Breathe in").unwrap();
        assert_eq!(cfg.session.total_minutes, 12);
        assert!(!cfg.cues.enabled);
        assert_eq!(cfg.display.phase1_label, "Breathe in");

        assert!(matches!(
            cfg.apply("session.total_minutes", "-1"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.apply("session.bogus", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.apply("session", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.apply("session.phase1_seconds", "7").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().session.phase1_seconds, 7);
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "session = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }
}
