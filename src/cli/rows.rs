//! Transaction row CLI commands
//!
//! Implements CLI commands for reviewing statement rows: listing, manual
//! classification and status changes. Rows are numbered from 1.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_row_details, format_row_register};
use crate::error::{ReviewError, ReviewResult};
use crate::models::RowStatus;
use crate::services::ReviewSession;
use crate::storage::Storage;

/// Row subcommands
#[derive(Subcommand)]
pub enum RowCommands {
    /// List statement rows
    List {
        /// Only show rows awaiting review
        #[arg(short, long)]
        pending: bool,
    },
    /// Show a row and the categories on offer for it
    Show {
        /// Row number
        row: usize,
    },
    /// Classify a row manually
    Set {
        /// Row number
        row: usize,
        /// Category type
        #[arg(short = 'y', long = "type")]
        category_type: Option<String>,
        /// Category name
        #[arg(short = 'n', long = "category")]
        category_name: Option<String>,
        /// Memo
        #[arg(short, long)]
        memo: Option<String>,
    },
    /// Change a row's review status (pending, validated, canceled)
    Status {
        /// Row number
        row: usize,
        /// New status
        status: String,
    },
}

/// Handle a row command
pub fn handle_row_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RowCommands,
) -> ReviewResult<()> {
    let (mut session, _) = ReviewSession::open(storage, settings)?;

    match cmd {
        RowCommands::List { pending } => {
            if pending {
                let rows: Vec<_> = session
                    .rows()
                    .iter()
                    .filter(|row| row.is_pending())
                    .cloned()
                    .collect();
                print!("{}", format_row_register(&rows, &settings.date_format));
            } else {
                print!("{}", format_row_register(session.rows(), &settings.date_format));
            }
        }

        RowCommands::Show { row } => {
            let index = row_index(row)?;
            print_details(&session, index)?;
        }

        RowCommands::Set {
            row,
            category_type,
            category_name,
            memo,
        } => {
            let index = row_index(row)?;
            let current = session
                .rows()
                .get(index)
                .ok_or_else(|| ReviewError::row_not_found(index))?;

            // Unspecified parts keep their current value
            let category_type = category_type.or_else(|| current.category_type.clone());
            let category_name = category_name.or_else(|| current.category_name.clone());

            session.edit_row_category(index, category_type, category_name)?;
            session.flush(&storage.gateway)?;

            // Memos are not part of the classification state; keep them with the rows
            if memo.is_some() {
                session.set_row_memo(index, memo)?;
                storage.save_rows(session.rows())?;
            }

            println!("Updated row #{}", row);
            print_details(&session, index)?;
        }

        RowCommands::Status { row, status } => {
            let index = row_index(row)?;
            let status: RowStatus = status.parse().map_err(ReviewError::Validation)?;
            session.set_row_status(index, status)?;
            session.flush(&storage.gateway)?;

            println!("Row #{} is now {}", row, status);
        }
    }

    Ok(())
}

fn print_details(session: &ReviewSession, index: usize) -> ReviewResult<()> {
    let row = session
        .rows()
        .get(index)
        .ok_or_else(|| ReviewError::row_not_found(index))?;
    let options = session.category_options(index)?;
    let choices = session.category_choices(index)?;
    print!("{}", format_row_details(index, row, &options, &choices));
    Ok(())
}

/// Convert a 1-based row number to an index
fn row_index(row: usize) -> ReviewResult<usize> {
    row.checked_sub(1)
        .ok_or_else(|| ReviewError::Validation("Row numbers start at 1".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_index() {
        assert_eq!(row_index(1).unwrap(), 0);
        assert!(row_index(0).unwrap_err().is_validation());
    }
}
