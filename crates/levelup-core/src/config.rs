//! TOML-based dashboard configuration.
//!
//! Stores:
//! - Buff clock cadence
//! - Buff fade window
//! - Sequence hold durations
//! - Sound asset paths
//!
//! Configuration is stored at `~/.config/levelup/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::clock::DEFAULT_TICK_INTERVAL_MS;
use crate::error::ConfigError;
use crate::sequence::Cue;
use crate::timer::DEFAULT_FADE_TICKS;

/// Clock configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Buff configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffConfig {
    /// Ticks an expired buff stays on screen before it is dropped.
    #[serde(default = "default_fade_ticks")]
    pub fade_ticks: u32,
}

/// Hold durations of the timed sequences, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceTimings {
    #[serde(default = "default_2000")]
    pub level_up_hold_ms: u64,
    #[serde(default = "default_2000")]
    pub xp_hold_ms: u64,
    #[serde(default = "default_1000")]
    pub xp_fade_ms: u64,
    #[serde(default = "default_1000")]
    pub rank_up_hold_ms: u64,
    #[serde(default = "default_100")]
    pub progress_fill_delay_ms: u64,
}

/// Sound assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_complete_sound")]
    pub complete_sound: String,
    #[serde(default = "default_unlock_sound")]
    pub unlock_sound: String,
}

/// Dashboard configuration.
///
/// Serialized to/from TOML at `~/.config/levelup/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub buffs: BuffConfig,
    #[serde(default)]
    pub sequences: SequenceTimings,
    #[serde(default)]
    pub audio: AudioConfig,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}
fn default_fade_ticks() -> u32 {
    DEFAULT_FADE_TICKS
}
fn default_2000() -> u64 {
    2000
}
fn default_1000() -> u64 {
    1000
}
fn default_100() -> u64 {
    100
}
fn default_true() -> bool {
    true
}
fn default_complete_sound() -> String {
    "static/assets/sounds/complete.mp3".into()
}
fn default_unlock_sound() -> String {
    "static/assets/sounds/unlock.mp3".into()
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl ClockConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for BuffConfig {
    fn default() -> Self {
        Self {
            fade_ticks: default_fade_ticks(),
        }
    }
}

impl Default for SequenceTimings {
    fn default() -> Self {
        Self {
            level_up_hold_ms: 2000,
            xp_hold_ms: 2000,
            xp_fade_ms: 1000,
            rank_up_hold_ms: 1000,
            progress_fill_delay_ms: 100,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            complete_sound: default_complete_sound(),
            unlock_sound: default_unlock_sound(),
        }
    }
}

impl AudioConfig {
    pub fn asset_for(&self, cue: Cue) -> &str {
        match cue {
            Cue::Complete => &self.complete_sound,
            Cue::Unlock => &self.unlock_sound,
        }
    }
}

/// Returns `~/.config/levelup[-dev]/` based on LEVELUP_ENV.
///
/// Set LEVELUP_ENV=dev to use the development directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LEVELUP_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("levelup-dev")
    } else {
        base_dir.join("levelup")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
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
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?
                    .into(),
            ),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("only leaf values can be set".to_string()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is
    /// missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
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
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}
