//! Application configuration
//!
//! Stored as `config.json` next to the review data. A missing file means
//! defaults; unknown or missing fields fall back to their defaults too.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::DEFAULT_BATCH_SIZE;
use crate::review::{JsonFileStore, ReminderTexts};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewConfig {
    /// Where review data lives (defaults to the platform data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Arm reminder timers on every stage change
    pub reminders_enabled: bool,
    pub reminder: ReminderTexts,
    /// Words requested per learning batch
    pub batch_size: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            reminders_enabled: true,
            reminder: ReminderTexts::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ReviewConfig {
    /// Load from `path`, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Configured data directory, or the platform default
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => JsonFileStore::default_data_dir().map_err(|_| ConfigError::DataDirNotFound),
        }
    }
}
