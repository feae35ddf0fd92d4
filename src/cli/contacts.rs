//! Contact CLI commands
//!
//! Implements CLI commands for contact management.

use std::fs;
use std::path::PathBuf;

use clap::Subcommand;

use crate::display::format_contact_list;
use crate::error::{ReviewError, ReviewResult};
use crate::models::Contact;
use crate::services::ContactService;
use crate::storage::file_io::write_text_atomic;
use crate::storage::Storage;

/// Contact subcommands
#[derive(Subcommand)]
pub enum ContactCommands {
    /// List all contacts
    List,
    /// Add a contact
    Add {
        /// CPF/CNPJ
        tax_id: String,
        /// Display name
        name: String,
        /// Legal (registered) name
        #[arg(short, long, default_value = "")]
        legal_name: String,
        /// Trade name
        #[arg(short, long, default_value = "")]
        trade_name: String,
    },
    /// Remove a contact by tax id or name
    Remove {
        /// Tax id or display name
        contact: String,
    },
    /// Export contacts as CSV
    Export {
        /// Output file path; prints to stdout if omitted
        output: Option<PathBuf>,
    },
    /// Replace contacts from a JSON or CSV file
    Import {
        /// Input file path (.json for a contact array, anything else is
        /// read as `;`-delimited CSV)
        input: PathBuf,
    },
}

/// Handle a contact command
pub fn handle_contact_command(storage: &Storage, cmd: ContactCommands) -> ReviewResult<()> {
    let service = ContactService::new(storage);

    match cmd {
        ContactCommands::List => {
            let contacts = service.list()?;
            println!("{}", format_contact_list(&contacts));
            if !contacts.is_empty() {
                println!("Total: {} contacts", contacts.len());
            }
        }

        ContactCommands::Add {
            tax_id,
            name,
            legal_name,
            trade_name,
        } => {
            let contact = Contact::new(tax_id, name)
                .with_legal_name(legal_name)
                .with_trade_name(trade_name);
            let contact = service.add(contact)?;
            println!("Added contact: {}", contact);
        }

        ContactCommands::Remove { contact } => {
            let removed = service.remove(&contact)?;
            println!("Removed contact: {}", removed);
        }

        ContactCommands::Export { output } => {
            let csv = service.export_csv()?;
            match output {
                Some(path) => {
                    write_text_atomic(&path, &csv)?;
                    println!("Exported contacts to {}", path.display());
                }
                None => print!("{}", csv),
            }
        }

        ContactCommands::Import { input } => {
            let text = fs::read_to_string(&input)
                .map_err(|e| ReviewError::Io(format!("Failed to read {}: {}", input.display(), e)))?;

            let is_json = input
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            let count = if is_json {
                service.import_json(&text)?
            } else {
                service.import_csv(&text)?
            };

            println!("Imported {} contact(s)", count);
        }
    }

    Ok(())
}
