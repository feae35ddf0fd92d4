//! Rule CLI commands
//!
//! Implements CLI commands for classification rule management. Every change
//! re-runs classification and saves both the rule state and the resulting
//! classification state.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::audit::{AuditEntry, EntityType, Operation};
use crate::config::Settings;
use crate::display::{format_rule_details, format_rule_list};
use crate::error::{ReviewError, ReviewResult};
use crate::models::{Rule, RuleForm};
use crate::services::{ReviewSession, RulesOrigin};
use crate::storage::Storage;

/// Rule subcommands
#[derive(Subcommand)]
pub enum RuleCommands {
    /// List rules in application order
    List,
    /// Show rule details
    Show {
        /// Rule ID
        rule: String,
    },
    /// Add a rule at the end of the list
    Add {
        /// Comma-separated substrings the description must contain
        #[arg(short = 'd', long, default_value = "")]
        contains: String,
        /// Transaction type to match (credit, debit); any if omitted
        #[arg(short = 't', long = "transaction-type", default_value = "")]
        transaction_type: String,
        /// Substring the contact must contain
        #[arg(short, long, default_value = "")]
        contact: String,
        /// Category type to assign
        #[arg(short = 'y', long = "type", default_value = "")]
        category_type: String,
        /// Category name to assign
        #[arg(short = 'n', long = "category", default_value = "")]
        category_name: String,
        /// Memo to write
        #[arg(short, long, default_value = "")]
        memo: String,
    },
    /// Edit one field of a rule
    Edit {
        /// Rule ID
        rule: String,
        /// Field name (description_contains, transaction_type, contact_equals,
        /// category_type, category_name, memo)
        field: String,
        /// New value; empty clears optional fields
        value: String,
    },
    /// Remove a rule
    Remove {
        /// Rule ID
        rule: String,
    },
    /// Export rules to a JSON file
    Export {
        /// Output file path
        output: PathBuf,
    },
    /// Replace all rules from a JSON file
    Import {
        /// Input file path
        input: PathBuf,
    },
    /// Forget the saved rule state
    Clean,
}

/// Handle a rule command
pub fn handle_rule_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RuleCommands,
) -> ReviewResult<()> {
    if let RuleCommands::Clean = cmd {
        storage.gateway.clean_rules()?;
        storage.log(&AuditEntry::new(
            Operation::Clean,
            EntityType::RuleSet,
            "rules",
        ))?;
        println!("Saved rules cleared. Configured rules apply on next load.");
        return Ok(());
    }

    let (mut session, origin) = ReviewSession::open(storage, settings)?;

    match cmd {
        RuleCommands::List => {
            if origin == RulesOrigin::Configured {
                println!("(no saved rules; showing configured rules)\n");
            }
            println!("{}", format_rule_list(session.rules()));
        }

        RuleCommands::Show { rule } => {
            let rule = session.find_rule(&rule)?;
            print!("{}", format_rule_details(rule));
        }

        RuleCommands::Add {
            contains,
            transaction_type,
            contact,
            category_type,
            category_name,
            memo,
        } => {
            let form = RuleForm {
                description_contains: contains,
                transaction_type,
                contact_equals: contact,
                category_type,
                category_name,
                memo,
            };
            let rule = Rule::from_form(&form).map_err(|e| ReviewError::Validation(e.to_string()))?;

            let summary = session.add_rule(rule.clone())?;
            persist(storage, &mut session)?;

            storage.log(
                &AuditEntry::create(EntityType::Rule, rule.id.to_string(), &rule)
                    .with_name(rule.to_string()),
            )?;

            println!("Added rule: {} [{}]", rule, rule.id);
            println!(
                "  {} row(s) classified, {} unmatched",
                summary.classified, summary.unmatched
            );
        }

        RuleCommands::Edit { rule, field, value } => {
            let id = session.find_rule(&rule)?.id;
            let (before, after) = session.update_rule_field(id, &field, &value)?;
            persist(storage, &mut session)?;

            storage.log(
                &AuditEntry::update(EntityType::Rule, id.to_string(), &before, &after)
                    .with_name(after.to_string()),
            )?;

            println!("Updated rule: {} [{}]", after, id);
        }

        RuleCommands::Remove { rule } => {
            let id = session.find_rule(&rule)?.id;
            let removed = session.remove_rule(id)?;
            persist(storage, &mut session)?;

            storage.log(
                &AuditEntry::delete(EntityType::Rule, id.to_string(), &removed)
                    .with_name(removed.to_string()),
            )?;

            println!("Removed rule: {} [{}]", removed, id);
        }

        RuleCommands::Export { output } => {
            let file = File::create(&output).map_err(|e| {
                ReviewError::Export(format!("Failed to create {}: {}", output.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            session.export_rules_json(&mut writer)?;
            writer
                .flush()
                .map_err(|e| ReviewError::Export(e.to_string()))?;

            println!(
                "Exported {} rule(s) to {}",
                session.rules().len(),
                output.display()
            );
        }

        RuleCommands::Import { input } => {
            let json = fs::read_to_string(&input)
                .map_err(|e| ReviewError::Io(format!("Failed to read {}: {}", input.display(), e)))?;
            let summary = session.import_rules_json(&json)?;
            persist(storage, &mut session)?;

            storage.log(
                &AuditEntry::new(Operation::Import, EntityType::RuleSet, "rules")
                    .with_after(&session.rules())
                    .with_summary(format!("{} rule(s) imported", session.rules().len())),
            )?;

            println!(
                "Imported {} rule(s); {} row(s) classified",
                session.rules().len(),
                summary.classified
            );
        }

        // Handled before the session is opened
        RuleCommands::Clean => {}
    }

    Ok(())
}

/// Save the rule list and the classification it produced
fn persist(storage: &Storage, session: &mut ReviewSession) -> ReviewResult<()> {
    session.save_rules(&storage.gateway)?;
    session.flush(&storage.gateway)?;
    Ok(())
}
