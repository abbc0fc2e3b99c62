//! Core error types for respir-core.
//!
//! Each fallible area has its own thiserror enum. Session validation
//! failures are user-facing; the others come from configuration I/O and
//! scheduler setup.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a session refuses to start.
///
/// Both are raised before any timer state is touched, so a rejected
/// start leaves a running session as it was.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Phase durations were given but the total duration is zero.
    #[error("Please set a duration in minutes.")]
    MissingTotalDuration,

    /// Both phase durations are zero.
    #[error("Please set seconds for at least one phase.")]
    NoPhaseDuration,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not name a configuration value
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Scheduler-specific errors.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// No tokio runtime is running on the current thread.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}
