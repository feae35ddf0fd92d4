//! Persistence backends
//!
//! A backend stores one opaque text payload per resource. The gateway owns
//! the payload formats; a backend only moves text in and out.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::config::paths::ReviewPaths;
use crate::error::{ReviewError, ReviewResult};

use super::file_io::{read_text, remove_if_exists, write_text_atomic};

/// Resource kinds kept by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Classification state snapshot (JSON)
    State,
    /// Rule state (JSON)
    Rules,
    /// Contacts (`;`-delimited CSV)
    Contacts,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State => write!(f, "classification state"),
            Self::Rules => write!(f, "rule state"),
            Self::Contacts => write!(f, "contacts"),
        }
    }
}

/// Storage for resource payloads
pub trait Backend: Send + Sync {
    /// Replace the stored payload
    fn put(&self, resource: Resource, payload: &str) -> ReviewResult<()>;

    /// Fetch the stored payload, `None` if nothing is stored
    fn get(&self, resource: Resource) -> ReviewResult<Option<String>>;

    /// Drop the stored payload; removing nothing is not an error
    fn remove(&self, resource: Resource) -> ReviewResult<()>;
}

/// One file per resource under the data directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    state_path: PathBuf,
    rules_path: PathBuf,
    contacts_path: PathBuf,
}

impl FileBackend {
    pub fn new(paths: &ReviewPaths) -> Self {
        Self {
            state_path: paths.saved_state_file(),
            rules_path: paths.saved_rules_file(),
            contacts_path: paths.contacts_file(),
        }
    }

    fn path(&self, resource: Resource) -> &PathBuf {
        match resource {
            Resource::State => &self.state_path,
            Resource::Rules => &self.rules_path,
            Resource::Contacts => &self.contacts_path,
        }
    }
}

impl Backend for FileBackend {
    fn put(&self, resource: Resource, payload: &str) -> ReviewResult<()> {
        write_text_atomic(self.path(resource), payload)
    }

    fn get(&self, resource: Resource) -> ReviewResult<Option<String>> {
        read_text(self.path(resource))
    }

    fn remove(&self, resource: Resource) -> ReviewResult<()> {
        remove_if_exists(self.path(resource))
    }
}

/// In-memory backend for tests and hosts without a disk
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RwLock<HashMap<Resource, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn put(&self, resource: Resource, payload: &str) -> ReviewResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ReviewError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.insert(resource, payload.to_string());
        Ok(())
    }

    fn get(&self, resource: Resource) -> ReviewResult<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| ReviewError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&resource).cloned())
    }

    fn remove(&self, resource: Resource) -> ReviewResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ReviewError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.remove(&resource);
        Ok(())
    }
}
