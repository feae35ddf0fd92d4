//! Path management for statement review
//!
//! Provides XDG-compliant path resolution for configuration and review data.
//!
//! ## Path Resolution Order
//!
//! 1. `STATEMENT_REVIEW_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/statement-review` or `~/.config/statement-review`
//! 3. Windows: `%APPDATA%\statement-review`

use std::path::PathBuf;

use crate::error::ReviewError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "STATEMENT_REVIEW_DATA_DIR";

/// Manages all paths used by statement review
#[derive(Debug, Clone)]
pub struct ReviewPaths {
    base_dir: PathBuf,
}

impl ReviewPaths {
    /// Create a new ReviewPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ReviewError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create ReviewPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/statement-review/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/statement-review/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Saved classification state
    pub fn saved_state_file(&self) -> PathBuf {
        self.data_dir().join("saved_state.json")
    }

    /// Saved rule state
    pub fn saved_rules_file(&self) -> PathBuf {
        self.data_dir().join("saved_rules.json")
    }

    /// Contacts, as `;`-delimited CSV
    pub fn contacts_file(&self) -> PathBuf {
        self.data_dir().join("contacts.csv")
    }

    /// Statement rows produced by the import pipeline
    pub fn statement_file(&self) -> PathBuf {
        self.data_dir().join("statement.json")
    }

    /// Category taxonomy
    pub fn taxonomy_file(&self) -> PathBuf {
        self.data_dir().join("taxonomy.json")
    }

    /// Configured rules, used before any rule state has been saved
    pub fn rules_file(&self) -> PathBuf {
        self.data_dir().join("rules.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), ReviewError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ReviewError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| ReviewError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the review directory has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, ReviewError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| ReviewError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("statement-review"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, ReviewError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| ReviewError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("statement-review"))
}
