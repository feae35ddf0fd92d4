//! Persistence gateway
//!
//! Save/load/clean for classification state and rule state, plus the
//! contacts file, over any [`Backend`]. Every save carries the full payload,
//! so the last save wins. An empty store loads as [`ReviewError::NotFound`];
//! callers treat that as "use the built-in defaults". Cleaning only resets
//! the store, in-memory state is the caller's to clear.

use crate::codec::{decode_contacts, encode_contacts};
use crate::error::{ReviewError, ReviewResult};
use crate::models::{Contact, Rule, Snapshot};

use super::backend::{Backend, Resource};

/// Typed persistence over a backend
pub struct Gateway {
    backend: Box<dyn Backend>,
}

impl Gateway {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Save the classification state
    pub fn save_state(&self, state: &Snapshot) -> ReviewResult<()> {
        self.put_json(Resource::State, state)
    }

    /// Load the saved classification state
    pub fn load_state(&self) -> ReviewResult<Snapshot> {
        self.get_json(Resource::State)
    }

    /// Forget the saved classification state
    pub fn clean_state(&self) -> ReviewResult<()> {
        self.remove(Resource::State)
    }

    /// Save the rule state
    pub fn save_rules(&self, rules: &[Rule]) -> ReviewResult<()> {
        self.put_json(Resource::Rules, rules)
    }

    /// Load the saved rule state
    pub fn load_rules(&self) -> ReviewResult<Vec<Rule>> {
        self.get_json(Resource::Rules)
    }

    /// Forget the saved rule state
    pub fn clean_rules(&self) -> ReviewResult<()> {
        self.remove(Resource::Rules)
    }

    /// Save contacts as CSV
    pub fn save_contacts(&self, contacts: &[Contact]) -> ReviewResult<()> {
        let payload = encode_contacts(contacts)?;
        self.put(Resource::Contacts, &payload)
    }

    /// Fetch and decode the contacts file
    pub fn load_contacts(&self) -> ReviewResult<Vec<Contact>> {
        let payload = self.get(Resource::Contacts)?;
        decode_contacts(&payload)
    }

    fn put_json<T: serde::Serialize + ?Sized>(&self, resource: Resource, data: &T) -> ReviewResult<()> {
        let payload = serde_json::to_string_pretty(data)
            .map_err(|e| ReviewError::Storage(format!("Failed to serialize {}: {}", resource, e)))?;
        self.put(resource, &payload)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, resource: Resource) -> ReviewResult<T> {
        let payload = self.get(resource)?;
        serde_json::from_str(&payload).map_err(|e| {
            tracing::warn!(%resource, error = %e, "Stored payload is malformed");
            ReviewError::Parse(format!("Stored {} is malformed: {}", resource, e))
        })
    }

    fn put(&self, resource: Resource, payload: &str) -> ReviewResult<()> {
        self.backend.put(resource, payload).map_err(|e| {
            tracing::warn!(%resource, error = %e, "Save failed");
            e
        })?;
        tracing::debug!(%resource, bytes = payload.len(), "Saved");
        Ok(())
    }

    fn get(&self, resource: Resource) -> ReviewResult<String> {
        let payload = self.backend.get(resource).map_err(|e| {
            tracing::warn!(%resource, error = %e, "Load failed");
            e
        })?;

        match payload {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ReviewError::resource_not_found(resource.to_string())),
        }
    }

    fn remove(&self, resource: Resource) -> ReviewResult<()> {
        self.backend.remove(resource).map_err(|e| {
            tracing::warn!(%resource, error = %e, "Clean failed");
            e
        })?;
        tracing::debug!(%resource, "Cleaned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ReviewPaths;
    use crate::models::{RowState, RowStatus};
    use crate::storage::backend::{FileBackend, MemoryBackend};
    use tempfile::TempDir;

    fn memory_gateway() -> Gateway {
        Gateway::new(Box::new(MemoryBackend::new()))
    }

    /// Backend whose every call fails, standing in for an unreachable store
    struct OfflineBackend;

    impl Backend for OfflineBackend {
        fn put(&self, _: Resource, _: &str) -> ReviewResult<()> {
            Err(ReviewError::Storage("connection refused".into()))
        }
        fn get(&self, _: Resource) -> ReviewResult<Option<String>> {
            Err(ReviewError::Storage("connection refused".into()))
        }
        fn remove(&self, _: Resource) -> ReviewResult<()> {
            Err(ReviewError::Storage("connection refused".into()))
        }
    }

    #[test]
    fn test_empty_store_is_not_found() {
        let gateway = memory_gateway();
        assert!(gateway.load_rules().unwrap_err().is_not_found());
        assert!(gateway.load_state().unwrap_err().is_not_found());
        assert!(gateway.load_contacts().unwrap_err().is_not_found());
    }

    #[test]
    fn test_rules_save_load_clean() {
        let gateway = memory_gateway();
        let rules = vec![Rule::new(vec!["PIX".into()], "Receipts", "Sales")];

        gateway.save_rules(&rules).unwrap();
        assert_eq!(gateway.load_rules().unwrap(), rules);

        gateway.clean_rules().unwrap();
        assert!(gateway.load_rules().unwrap_err().is_not_found());
    }

    #[test]
    fn test_state_last_write_wins() {
        let gateway = memory_gateway();
        let first = Snapshot::from_states(vec![RowState::default()]);
        let second = Snapshot::from_states(vec![RowState {
            category_type: Some("Expenses".into()),
            category_name: None,
            status: RowStatus::Validated,
        }]);

        gateway.save_state(&first).unwrap();
        gateway.save_state(&second).unwrap();
        assert_eq!(gateway.load_state().unwrap(), second);
    }

    #[test]
    fn test_contacts_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReviewPaths::with_base_dir(temp_dir.path().to_path_buf());
        let gateway = Gateway::new(Box::new(FileBackend::new(&paths)));

        let contacts = vec![Contact::new("123", "Acme"), Contact::new("456", "Globex")];
        gateway.save_contacts(&contacts).unwrap();

        let on_disk = std::fs::read_to_string(paths.contacts_file()).unwrap();
        assert!(on_disk.contains("\"Acme\""));
        assert_eq!(gateway.load_contacts().unwrap(), contacts);
    }

    #[test]
    fn test_malformed_payload_is_parse_error() {
        let backend = MemoryBackend::new();
        backend.put(Resource::Rules, "{oops").unwrap();
        let gateway = Gateway::new(Box::new(backend));
        assert!(gateway.load_rules().unwrap_err().is_parse());
    }

    #[test]
    fn test_backend_failure_surfaces_as_storage_error() {
        let gateway = Gateway::new(Box::new(OfflineBackend));
        assert!(matches!(
            gateway.save_rules(&[]),
            Err(ReviewError::Storage(_))
        ));
        assert!(matches!(gateway.load_state(), Err(ReviewError::Storage(_))));
        assert!(matches!(gateway.clean_state(), Err(ReviewError::Storage(_))));
    }
}
