//! Statement review - rule-based classification of bank-statement transactions
//!
//! This library provides the review stage that follows a bank-statement
//! import: statement rows are classified by an ordered list of rules, edited
//! by hand, validated or canceled, and the resulting classification state is
//! persisted, undoable and exportable.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, settings and built-in defaults
//! - `error`: Custom error types
//! - `models`: Core data models (rows, rules, contacts, taxonomy, snapshots)
//! - `codec`: Delimited-text and JSON import/export formats
//! - `storage`: Persistence gateway over file or in-memory backends
//! - `services`: Classification, undo/redo history, autosave and the review session
//! - `audit`: Audit logging system
//! - `reports`: Transaction report
//! - `display`, `cli`: Terminal output and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use statement_review::config::{ReviewPaths, Settings};
//! use statement_review::services::ReviewSession;
//! use statement_review::storage::Storage;
//!
//! let paths = ReviewPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! let (mut session, _) = ReviewSession::open(&storage, &settings)?;
//! session.reclassify();
//! session.flush(&storage.gateway)?;
//! ```

pub mod audit;
pub mod cli;
pub mod codec;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ReviewError, ReviewResult};
