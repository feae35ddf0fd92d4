//! Storage layer for statement review
//!
//! Provides the persistence gateway over pluggable backends, plus direct
//! access to the pipeline's statement file and the taxonomy/rules
//! configuration in the data directory.

pub mod backend;
pub mod file_io;
pub mod gateway;

pub use backend::{Backend, FileBackend, MemoryBackend, Resource};
pub use file_io::{read_json, write_json_atomic};
pub use gateway::Gateway;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::defaults::{default_rules, default_taxonomy};
use crate::config::paths::ReviewPaths;
use crate::error::ReviewError;
use crate::models::{Rule, Taxonomy, TransactionRow};

/// Main storage coordinator
pub struct Storage {
    paths: ReviewPaths,
    pub gateway: Gateway,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance backed by files under `paths`
    pub fn new(paths: ReviewPaths) -> Result<Self, ReviewError> {
        paths.ensure_directories()?;

        Ok(Self {
            gateway: Gateway::new(Box::new(FileBackend::new(&paths))),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Create a Storage whose gateway uses another backend
    pub fn with_backend(paths: ReviewPaths, backend: Box<dyn Backend>) -> Self {
        Self {
            gateway: Gateway::new(backend),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        }
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &ReviewPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Append an entry to the audit log
    pub fn log(&self, entry: &AuditEntry) -> Result<(), ReviewError> {
        self.audit.log(entry)
    }

    /// Load the statement rows written by the import pipeline
    pub fn load_rows(&self) -> Result<Vec<TransactionRow>, ReviewError> {
        Ok(read_json(self.paths.statement_file())?.unwrap_or_default())
    }

    /// Write the statement rows back
    pub fn save_rows(&self, rows: &[TransactionRow]) -> Result<(), ReviewError> {
        write_json_atomic(self.paths.statement_file(), &rows)
    }

    /// Load the taxonomy file, or the built-in taxonomy if there is none
    pub fn load_taxonomy(&self) -> Result<Taxonomy, ReviewError> {
        match read_json(self.paths.taxonomy_file())? {
            Some(taxonomy) => Ok(taxonomy),
            None => default_taxonomy(),
        }
    }

    /// Load the configured rules file, or the built-in rules if there is none
    ///
    /// This is the fallback used when no rule state has been saved.
    pub fn load_configured_rules(&self) -> Result<Vec<Rule>, ReviewError> {
        match read_json(self.paths.rules_file())? {
            Some(rules) => Ok(rules),
            None => default_rules(),
        }
    }
}
