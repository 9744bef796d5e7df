mod config;
pub mod database;

pub use config::{Config, DecayConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::StorageError;

/// Persistence keys. These names are the external contract shared with the
/// backup format, so they stay camelCase.
pub mod keys {
    pub const TRAINING_DATA: &str = "trainingData";
    pub const SUPPLEMENT_DATA: &str = "supplementData";
    pub const TRAINING_HISTORY: &str = "trainingHistory";
    pub const KI_HISTORY: &str = "kiHistory";
    pub const SUPPLEMENT_HISTORY: &str = "supplementHistory";
    pub const LAST_KI_DECAY: &str = "lastKiDecayTimestamp";
}

/// Persistence gateway the core saves through.
///
/// Saves are synchronous fire-and-forget; durability beyond a returned error
/// is the implementation's problem.
pub trait StateStore {
    /// Load the value stored under `key`, or `None` if absent.
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;
    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError>;
    /// Drop every stored key.
    fn clear_all(&self) -> Result<(), StorageError>;
}

/// Returns the tracker data directory, created if absent.
///
/// SAIYAN_DATA_DIR overrides the location entirely (tests point it at a
/// temp dir). Otherwise it is `~/.config/saiyan-tracker`, or
/// `~/.config/saiyan-tracker-dev` when SAIYAN_ENV=dev.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("SAIYAN_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SAIYAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("saiyan-tracker-dev")
            } else {
                base_dir.join("saiyan-tracker")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
