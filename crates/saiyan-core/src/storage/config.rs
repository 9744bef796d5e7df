//! TOML-based application configuration.
//!
//! Stored at `~/.config/saiyan-tracker/config.toml`. Only ambient knobs live
//! here (the decay daemon cadence); progression constants such as base goals,
//! the form table and the ki cap are fixed invariants, not configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::CoreError;

/// Decay daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Minutes between periodic decay ticks.
    #[serde(default = "default_tick_minutes")]
    pub tick_minutes: u64,
    /// One ki point lost per this many minutes of catch-up gap.
    #[serde(default = "default_minutes_per_point")]
    pub minutes_per_point: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub decay: DecayConfig,
}

fn default_tick_minutes() -> u64 {
    10
}
fn default_minutes_per_point() -> u64 {
    10
}
fn default_true() -> bool {
    true
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            tick_minutes: default_tick_minutes(),
            minutes_per_point: default_minutes_per_point(),
            enabled: true,
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)
                    .map_err(|e| CoreError::Config(format!("config.toml: {e}")))?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), CoreError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CoreError::Config(format!("serialize: {e}")))?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error. Never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
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
        assert_eq!(parsed.decay.tick_minutes, 10);
        assert_eq!(parsed.decay.minutes_per_point, 10);
        assert!(parsed.decay.enabled);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[decay]\nenabled = false\n").unwrap();
        assert!(!parsed.decay.enabled);
        assert_eq!(parsed.decay.tick_minutes, 10);
    }
}
