//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod contacts;
pub mod report;
pub mod rows;
pub mod rules;
pub mod state;

pub use contacts::{handle_contact_command, ContactCommands};
pub use report::handle_report_command;
pub use rows::{handle_row_command, RowCommands};
pub use rules::{handle_rule_command, RuleCommands};
pub use state::{handle_state_command, StateCommands};
