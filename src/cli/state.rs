//! Classification state CLI commands
//!
//! Save, inspect, reset and move the per-row classification state
//! (category type, category name and status of every row).

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::audit::{snapshot_diff, AuditEntry, EntityType, Operation};
use crate::config::Settings;
use crate::error::{ReviewError, ReviewResult};
use crate::models::{RowStatus, Snapshot};
use crate::services::ReviewSession;
use crate::storage::Storage;

/// State subcommands
#[derive(Subcommand)]
pub enum StateCommands {
    /// Re-save the saved classification state against the current statement
    ///
    /// Useful after the statement file changes: the saved state is applied
    /// to the current rows and written back at the statement's length.
    Save,
    /// Show the saved classification state
    Load,
    /// Forget the saved classification state
    Clean,
    /// Export the classification state to a JSON file
    Export {
        /// Output file path
        output: PathBuf,
    },
    /// Apply a classification state from a JSON file
    Import {
        /// Input file path
        input: PathBuf,
    },
}

/// Handle a state command
pub fn handle_state_command(
    storage: &Storage,
    settings: &Settings,
    cmd: StateCommands,
) -> ReviewResult<()> {
    match cmd {
        StateCommands::Save => {
            let previous = match storage.gateway.load_state() {
                Ok(state) => Some(state),
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e),
            };
            let (mut session, _) = ReviewSession::open(storage, settings)?;
            let saved = session.save(&storage.gateway)?;

            let mut entry = AuditEntry::new(
                Operation::Update,
                EntityType::ClassificationState,
                "state",
            );
            if let Some(summary) = previous.and_then(|before| snapshot_diff(&before, &saved)) {
                entry = entry.with_summary(summary);
            }
            storage.log(&entry)?;

            println!("Saved classification state for {} row(s).", saved.len());
        }

        StateCommands::Load => match storage.gateway.load_state() {
            Ok(state) => print!("{}", format_state_summary(&state)),
            Err(e) if e.is_not_found() => println!("No saved classification state."),
            Err(e) => return Err(e),
        },

        StateCommands::Clean => {
            storage.gateway.clean_state()?;
            storage.log(&AuditEntry::new(
                Operation::Clean,
                EntityType::ClassificationState,
                "state",
            ))?;
            println!("Saved classification state cleared.");
        }

        StateCommands::Export { output } => {
            let (session, _) = ReviewSession::open(storage, settings)?;
            let file = File::create(&output).map_err(|e| {
                ReviewError::Export(format!("Failed to create {}: {}", output.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            session.export_state_json(&mut writer)?;
            writer
                .flush()
                .map_err(|e| ReviewError::Export(e.to_string()))?;

            println!(
                "Exported classification state for {} row(s) to {}",
                session.rows().len(),
                output.display()
            );
        }

        StateCommands::Import { input } => {
            let json = fs::read_to_string(&input)
                .map_err(|e| ReviewError::Io(format!("Failed to read {}: {}", input.display(), e)))?;

            let (mut session, _) = ReviewSession::open(storage, settings)?;
            let before = session.snapshot();
            let changed = session.import_state_json(&json)?;
            session.flush(&storage.gateway)?;

            let mut entry = AuditEntry::new(
                Operation::Import,
                EntityType::ClassificationState,
                "state",
            );
            if let Some(summary) = snapshot_diff(&before, &session.snapshot()) {
                entry = entry.with_summary(summary);
            }
            storage.log(&entry)?;

            println!(
                "Imported classification state; category type changed on {} row(s).",
                changed.len()
            );
        }
    }

    Ok(())
}

fn format_state_summary(state: &Snapshot) -> String {
    let classified = state
        .states()
        .iter()
        .filter(|s| s.category_type.is_some() || s.category_name.is_some())
        .count();
    let count = |status: RowStatus| state.states().iter().filter(|s| s.status == status).count();

    format!(
        "Saved classification state: {} row(s)\n  Classified: {}\n  Pending:    {}\n  Validated:  {}\n  Canceled:   {}\n",
        state.len(),
        classified,
        count(RowStatus::Pending),
        count(RowStatus::Validated),
        count(RowStatus::Canceled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RowState;

    #[test]
    fn test_state_summary() {
        let state = Snapshot::from_states(vec![
            RowState {
                category_type: Some("Expenses".into()),
                category_name: None,
                status: RowStatus::Validated,
            },
            RowState {
                category_type: None,
                category_name: None,
                status: RowStatus::Pending,
            },
        ]);

        let summary = format_state_summary(&state);
        assert!(summary.contains("2 row(s)"));
        assert!(summary.contains("Classified: 1"));
        assert!(summary.contains("Validated:  1"));
    }
}
