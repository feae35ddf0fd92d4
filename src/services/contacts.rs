//! Contact service
//!
//! Manages the contacts list stored through the gateway as `;`-delimited
//! CSV. Every change rewrites the whole file and is recorded in the audit
//! log.

use crate::audit::{AuditEntry, EntityType, Operation};
use crate::codec::{decode_contacts, encode_contacts};
use crate::error::{ReviewError, ReviewResult};
use crate::models::Contact;
use crate::storage::Storage;

/// Service for contact management
pub struct ContactService<'a> {
    storage: &'a Storage,
}

impl<'a> ContactService<'a> {
    /// Create a new contact service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// List all contacts; an empty store is an empty list
    pub fn list(&self) -> ReviewResult<Vec<Contact>> {
        match self.storage.gateway.load_contacts() {
            Ok(contacts) => Ok(contacts),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Find a contact by tax id or display name
    pub fn find(&self, reference: &str) -> ReviewResult<Option<Contact>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|contact| contact.matches_reference(reference)))
    }

    /// Append a contact
    pub fn add(&self, contact: Contact) -> ReviewResult<Contact> {
        contact
            .validate()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;

        let mut contacts = self.list()?;
        contacts.push(contact.clone());
        self.storage.gateway.save_contacts(&contacts)?;

        self.storage.log(
            &AuditEntry::create(EntityType::Contact, contact.tax_id.clone(), &contact)
                .with_name(contact.display_name.clone()),
        )?;

        Ok(contact)
    }

    /// Remove the first contact matching a reference
    pub fn remove(&self, reference: &str) -> ReviewResult<Contact> {
        let mut contacts = self.list()?;
        let position = contacts
            .iter()
            .position(|contact| contact.matches_reference(reference))
            .ok_or_else(|| ReviewError::NotFound {
                entity_type: "Contact",
                identifier: reference.to_string(),
            })?;

        let removed = contacts.remove(position);
        self.storage.gateway.save_contacts(&contacts)?;

        self.storage.log(
            &AuditEntry::delete(EntityType::Contact, removed.tax_id.clone(), &removed)
                .with_name(removed.display_name.clone()),
        )?;

        Ok(removed)
    }

    /// Replace the contacts list from CSV text
    ///
    /// Blank or junk rows are dropped by the decoder; rows with neither a
    /// tax id nor a name are skipped. Returns the number of contacts kept.
    pub fn import_csv(&self, raw: &str) -> ReviewResult<usize> {
        let contacts: Vec<Contact> = decode_contacts(raw)?
            .into_iter()
            .filter(|contact| contact.validate().is_ok())
            .collect();

        self.replace(&contacts)
    }

    /// Replace the contacts list from a JSON array of contact objects
    ///
    /// The whole document is parsed before anything is written.
    pub fn import_json(&self, json: &str) -> ReviewResult<usize> {
        let contacts: Vec<Contact> = serde_json::from_str(json)
            .map_err(|e| ReviewError::Parse(format!("Invalid contacts JSON: {}", e)))?;

        for (i, contact) in contacts.iter().enumerate() {
            contact
                .validate()
                .map_err(|e| ReviewError::Validation(format!("Contact #{}: {}", i + 1, e)))?;
        }

        self.replace(&contacts)
    }

    fn replace(&self, contacts: &[Contact]) -> ReviewResult<usize> {
        self.storage.gateway.save_contacts(contacts)?;

        self.storage.log(
            &AuditEntry::new(Operation::Import, EntityType::Contact, "contacts")
                .with_summary(format!("{} contact(s) imported", contacts.len())),
        )?;

        Ok(contacts.len())
    }

    /// Render the contacts list as CSV text
    pub fn export_csv(&self) -> ReviewResult<String> {
        encode_contacts(&self.list()?)
    }
}
