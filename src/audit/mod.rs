//! Audit logging for statement review
//!
//! Records every change to rules, contacts and classification state, with
//! before/after values, in an append-only JSONL log.
//!
//! # Example
//!
//! ```rust,ignore
//! use statement_review::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::update(EntityType::Rule, rule.id.to_string(), &before, &after))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{generate_diff, snapshot_diff};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
