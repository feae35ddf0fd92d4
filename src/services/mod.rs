//! Service layer for statement review
//!
//! The service layer provides the review logic on top of the storage layer:
//! rule classification, undo/redo history, debounced autosave, the review
//! session tying them together, and contact management.

pub mod autosave;
pub mod classifier;
pub mod contacts;
pub mod history;
pub mod session;

pub use autosave::Autosave;
pub use classifier::ClassifySummary;
pub use contacts::ContactService;
pub use history::History;
pub use session::{load_rules_with_fallback, ReviewSession, RulesOrigin};
