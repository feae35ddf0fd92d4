//! CLI command for the transaction report

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::Settings;
use crate::error::{ReviewError, ReviewResult};
use crate::reports::TransactionReport;
use crate::services::ReviewSession;
use crate::storage::Storage;

/// Generate the transaction report
///
/// Writes the CSV when an output path is given; always prints the summary.
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    output: Option<&Path>,
) -> ReviewResult<()> {
    let (session, _) = ReviewSession::open(storage, settings)?;
    let report = TransactionReport::generate(session.rows(), &settings.date_format);

    if let Some(path) = output {
        let file = File::create(path).map_err(|e| {
            ReviewError::Export(format!(
                "Failed to create file {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut writer = BufWriter::new(file);
        report.export_csv(&mut writer)?;
        writer
            .flush()
            .map_err(|e| ReviewError::Export(e.to_string()))?;
        println!("Transaction report exported to: {}", path.display());
        println!();
    }

    print!("{}", report.format_terminal(&settings.currency_symbol));
    Ok(())
}
