//! Audit entry data structures
//!
//! One entry per change to review data: a rule added, edited or removed, a
//! contact list change, or a classification state saved, imported or
//! cleaned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Whole collection replaced from an import file
    Import,
    /// Stored state reset
    Clean,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Import => write!(f, "IMPORT"),
            Operation::Clean => write!(f, "CLEAN"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Rule,
    /// The rule list as a whole
    RuleSet,
    Contact,
    ClassificationState,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Rule => write!(f, "Rule"),
            EntityType::RuleSet => write!(f, "RuleSet"),
            EntityType::Contact => write!(f, "Contact"),
            EntityType::ClassificationState => write!(f, "ClassificationState"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Rule id, contact tax id, or a resource label for whole collections
    pub entity_id: String,

    /// Human-readable description of the entity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    /// Start an entry with no payload
    pub fn new(operation: Operation, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a newly created entity
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Self {
        Self::new(Operation::Create, entity_type, entity_id).with_after(entity)
    }

    /// Entry for an edit; the diff summary is computed from both states
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Update, entity_type, entity_id)
            .with_before(before)
            .with_after(after);
        if let (Some(b), Some(a)) = (&entry.before, &entry.after) {
            entry.diff_summary = super::diff::generate_diff(b, a);
        }
        entry
    }

    /// Entry for a removed entity
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Self {
        Self::new(Operation::Delete, entity_type, entity_id).with_before(entity)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    pub fn with_before<T: Serialize>(mut self, value: &T) -> Self {
        self.before = serde_json::to_value(value).ok();
        self
    }

    pub fn with_after<T: Serialize>(mut self, value: &T) -> Self {
        self.after = serde_json::to_value(value).ok();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.diff_summary = Some(summary.into());
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Import.to_string(), "IMPORT");
        assert_eq!(
            EntityType::ClassificationState.to_string(),
            "ClassificationState"
        );
    }

    #[test]
    fn test_update_entry_computes_diff() {
        let before = json!({"category_type": "Expenses", "memo": null});
        let after = json!({"category_type": "Taxes", "memo": null});

        let entry = AuditEntry::update(EntityType::Rule, "rul-12345678", &before, &after);

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(
            entry.diff_summary.as_deref(),
            Some("category_type: \"Expenses\" -> \"Taxes\"")
        );
    }

    #[test]
    fn test_create_and_delete_payloads() {
        let data = json!({"display_name": "Acme"});
        let created = AuditEntry::create(EntityType::Contact, "123", &data);
        assert!(created.before.is_none());
        assert!(created.after.is_some());

        let deleted = AuditEntry::delete(EntityType::Contact, "123", &data);
        assert!(deleted.before.is_some());
        assert!(deleted.after.is_none());
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let entry = AuditEntry::new(Operation::Clean, EntityType::RuleSet, "rule state");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"entity_type\":\"rule_set\""));
        assert!(!json.contains("before"));

        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.operation, Operation::Clean);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::new(Operation::Import, EntityType::RuleSet, "rule state")
            .with_name("rules.json")
            .with_summary("4 rules");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("IMPORT RuleSet rule state (rules.json)"));
        assert!(formatted.contains("Changes: 4 rules"));
    }
}
