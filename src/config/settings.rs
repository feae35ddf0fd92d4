//! User settings for statement review
//!
//! Manages review preferences: history depth, autosave quiet window and
//! display formats.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::paths::ReviewPaths;
use crate::error::ReviewError;

/// User settings for statement review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Maximum number of snapshots kept on each of the undo and redo stacks
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,

    /// Quiet period after the last edit before an autosave fires
    #[serde(default = "default_autosave_quiet_ms")]
    pub autosave_quiet_ms: u64,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Currency symbol shown next to amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_history_depth() -> usize {
    100
}

fn default_autosave_quiet_ms() -> u64 {
    400
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_currency() -> String {
    "R$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            history_depth: default_history_depth(),
            autosave_quiet_ms: default_autosave_quiet_ms(),
            date_format: default_date_format(),
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Autosave quiet window as a duration
    pub fn autosave_quiet_window(&self) -> Duration {
        Duration::from_millis(self.autosave_quiet_ms)
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ReviewPaths) -> Result<Self, ReviewError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| ReviewError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ReviewError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            if settings.history_depth == 0 {
                return Err(ReviewError::Config(
                    "history_depth must be at least 1".into(),
                ));
            }

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ReviewPaths) -> Result<(), ReviewError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ReviewError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ReviewError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
