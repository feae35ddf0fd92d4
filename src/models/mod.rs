//! Core data models for statement review
//!
//! This module contains the data structures of the review domain:
//! transaction rows, classification rules, contacts, the category taxonomy
//! and classification snapshots.

pub mod contact;
pub mod ids;
pub mod money;
pub mod rule;
pub mod snapshot;
pub mod taxonomy;
pub mod transaction;

pub use contact::{Contact, ContactValidationError};
pub use ids::RuleId;
pub use money::Money;
pub use rule::{Rule, RuleField, RuleForm, RuleValidationError};
pub use snapshot::{RowState, Snapshot};
pub use taxonomy::{CategoryChoices, Taxonomy};
pub use transaction::{RowStatus, StatusTransitionError, TransactionRow, TransactionType};
