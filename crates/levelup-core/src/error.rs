//! Core error types for levelup-core.
//!
//! Registration input is rejected at the boundary with [`TimerError`].
//! Everything else (unknown ids, failed side effects) is absorbed by the
//! engine and the sequencer, so callers only ever see these types on the
//! few operations that return a `Result`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for levelup-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer registry errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Audio or modal side effect failed
    #[error("Side effect failed: {0}")]
    SideEffect(#[from] SideEffectError),

    /// The dashboard driver task is gone
    #[error("Dashboard driver stopped")]
    DriverStopped,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Timer registry errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Bad registration input, rejected before any mutation.
    #[error("Invalid timer state for '{id}': {reason}")]
    InvalidTimerState { id: String, reason: String },

    /// Query against an id the registry does not hold.
    #[error("Timer '{0}' not found")]
    NotFound(String),
}

/// Failure of a fire-and-forget side effect (audio cue, modal).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SideEffectError {
    /// Sound asset is missing or unreadable
    #[error("Audio asset unavailable: {0}")]
    AssetUnavailable(String),

    /// Playback refused by the platform (autoplay policy, muted device)
    #[error("Playback blocked: {0}")]
    PlaybackBlocked(String),

    /// Modal could not be shown
    #[error("Modal '{0}' could not be shown")]
    ModalUnavailable(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config directory could not be resolved or created
    #[error("Failed to access config directory: {0}")]
    DataDir(String),
}

impl TimerError {
    pub(crate) fn invalid(id: &str, reason: impl Into<String>) -> Self {
        TimerError::InvalidTimerState {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
