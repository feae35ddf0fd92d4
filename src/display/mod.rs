//! Display formatting for terminal output
//!
//! Provides utilities for formatting rows, rules and contacts for terminal
//! display.

pub mod contact;
pub mod rule;
pub mod transaction;

pub use contact::format_contact_list;
pub use rule::{format_rule_details, format_rule_list};
pub use transaction::{format_row, format_row_details, format_row_register};
