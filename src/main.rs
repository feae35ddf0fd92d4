use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use statement_review::audit::{snapshot_diff, AuditEntry, EntityType, Operation};
use statement_review::cli::{
    handle_contact_command, handle_report_command, handle_row_command, handle_rule_command,
    handle_state_command,
};
use statement_review::config::defaults::{default_rules, default_taxonomy};
use statement_review::config::{ReviewPaths, Settings};
use statement_review::services::ReviewSession;
use statement_review::storage::{write_json_atomic, Storage};

#[derive(Parser)]
#[command(
    name = "statement-review",
    version,
    about = "Rule-based review of imported bank-statement transactions",
    long_about = "statement-review classifies the rows of an imported bank statement \
                  with an ordered list of rules, lets you correct and validate them, \
                  and keeps the classification state saved, undoable and exportable."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, settings and default taxonomy/rules
    Init,

    /// Show current configuration and paths
    Config,

    /// Re-run all rules over pending rows and save the result
    Classify,

    /// Statement row review commands
    #[command(subcommand)]
    Rows(statement_review::cli::RowCommands),

    /// Classification rule commands
    #[command(subcommand)]
    Rules(statement_review::cli::RuleCommands),

    /// Saved classification state commands
    #[command(subcommand)]
    State(statement_review::cli::StateCommands),

    /// Contact management commands
    #[command(subcommand)]
    Contacts(statement_review::cli::ContactCommands),

    /// Export the transaction report as CSV
    Report {
        /// Output file path; only the summary is printed if omitted
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = ReviewPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing statement review at: {}", paths.base_dir().display());
            settings.save(&paths)?;

            if !paths.taxonomy_file().exists() {
                write_json_atomic(paths.taxonomy_file(), &default_taxonomy()?)?;
            }
            if !paths.rules_file().exists() {
                write_json_atomic(paths.rules_file(), &default_rules()?)?;
            }

            println!("Initialization complete!");
            println!();
            println!("Place the imported statement at:");
            println!("  {}", paths.statement_file().display());
            println!();
            println!("Run 'statement-review rules list' to see the starter rules.");
        }
        Some(Commands::Config) => {
            println!("Statement Review Configuration");
            println!("==============================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Statement file:  {}", paths.statement_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  History depth:      {}", settings.history_depth);
            println!("  Autosave quiet ms:  {}", settings.autosave_quiet_ms);
            println!("  Date format:        {}", settings.date_format);
            println!("  Currency symbol:    {}", settings.currency_symbol);
        }
        Some(Commands::Classify) => {
            let (mut session, _) = ReviewSession::open(&storage, &settings)?;
            let before = session.snapshot();
            let summary = session.reclassify();
            let saved = session.save(&storage.gateway)?;

            let mut entry = AuditEntry::new(
                Operation::Update,
                EntityType::ClassificationState,
                "state",
            );
            if let Some(diff) = snapshot_diff(&before, &saved) {
                entry = entry.with_summary(diff);
            }
            storage.log(&entry)?;

            println!(
                "Applied {} rule(s): {} row(s) classified, {} unmatched, {} locked",
                session.rules().len(),
                summary.classified,
                summary.unmatched,
                summary.locked
            );
        }
        Some(Commands::Rows(cmd)) => {
            handle_row_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Rules(cmd)) => {
            handle_rule_command(&storage, &settings, cmd)?;
        }
        Some(Commands::State(cmd)) => {
            handle_state_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Contacts(cmd)) => {
            handle_contact_command(&storage, cmd)?;
        }
        Some(Commands::Report { output }) => {
            handle_report_command(&storage, &settings, output.as_deref())?;
        }
        None => {
            println!("statement-review - rule-based bank statement review");
            println!();
            println!("Run 'statement-review --help' for usage information.");
        }
    }

    Ok(())
}
