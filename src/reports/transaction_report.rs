//! Transaction Report
//!
//! The reviewed statement as a flat table: one line per row in display
//! order, with the classification the user settled on.

use std::collections::BTreeMap;
use std::io::Write;

use crate::codec::{CsvCodec, Record};
use crate::error::{ReviewError, ReviewResult};
use crate::models::{Money, RowStatus, TransactionRow};

/// Report columns, in export order
pub const REPORT_COLUMNS: [&str; 10] = [
    "Date",
    "Description",
    "Amount",
    "TransactionType",
    "Document",
    "Contact",
    "Type",
    "Category",
    "Memo",
    "Status",
];

/// One report line
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub date: String,
    pub description: String,
    pub amount: Money,
    pub transaction_type: String,
    pub document: String,
    pub contact: String,
    pub category_type: String,
    pub category_name: String,
    pub memo: String,
    pub status: RowStatus,
}

impl ReportLine {
    fn from_row(row: &TransactionRow, date_format: &str) -> Self {
        Self {
            date: row.date.format(date_format).to_string(),
            description: row.description.clone(),
            amount: row.amount,
            transaction_type: row.transaction_type.label().to_string(),
            document: row.document.clone(),
            contact: row.display_contact().unwrap_or_default().to_string(),
            category_type: row.category_type.clone().unwrap_or_default(),
            category_name: row.category_name.clone().unwrap_or_default(),
            memo: row.memo.clone().unwrap_or_default(),
            status: row.status,
        }
    }

    fn to_record(&self) -> Record {
        let values = [
            self.date.clone(),
            self.description.clone(),
            self.amount.to_string(),
            self.transaction_type.clone(),
            self.document.clone(),
            self.contact.clone(),
            self.category_type.clone(),
            self.category_name.clone(),
            self.memo.clone(),
            self.status.to_string().to_lowercase(),
        ];
        REPORT_COLUMNS.iter().copied().zip(values).collect()
    }
}

/// Per category type totals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTotal {
    pub total: Money,
    pub count: usize,
}

/// Transaction Report
#[derive(Debug, Clone)]
pub struct TransactionReport {
    pub lines: Vec<ReportLine>,
    /// Totals keyed by category type; unclassified rows under ""
    pub by_type: BTreeMap<String, TypeTotal>,
    pub pending: usize,
    pub validated: usize,
    pub canceled: usize,
}

impl TransactionReport {
    /// Build the report from rows in display order
    pub fn generate(rows: &[TransactionRow], date_format: &str) -> Self {
        let lines: Vec<ReportLine> = rows
            .iter()
            .map(|row| ReportLine::from_row(row, date_format))
            .collect();

        let mut by_type: BTreeMap<String, TypeTotal> = BTreeMap::new();
        let (mut pending, mut validated, mut canceled) = (0, 0, 0);

        for line in &lines {
            match line.status {
                RowStatus::Pending => pending += 1,
                RowStatus::Validated => validated += 1,
                RowStatus::Canceled => {
                    canceled += 1;
                    continue;
                }
            }
            let entry = by_type.entry(line.category_type.clone()).or_default();
            entry.total = entry.total + line.amount;
            entry.count += 1;
        }

        Self {
            lines,
            by_type,
            pending,
            validated,
            canceled,
        }
    }

    /// Export the report to CSV format
    ///
    /// The header is always written, even for an empty statement.
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> ReviewResult<()> {
        let text = if self.lines.is_empty() {
            format!("{}\n", REPORT_COLUMNS.join(","))
        } else {
            let records: Vec<Record> = self.lines.iter().map(ReportLine::to_record).collect();
            CsvCodec::report().encode(&records)?
        };

        writer
            .write_all(text.as_bytes())
            .map_err(|e| ReviewError::Export(e.to_string()))
    }

    /// Format a summary for terminal display
    ///
    /// Canceled rows are counted but left out of the totals.
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Transaction Report: {} row(s)\n", self.lines.len()));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Pending: {}  Validated: {}  Canceled: {}\n\n",
            self.pending, self.validated, self.canceled
        ));

        output.push_str(&format!("{:<30} {:>16} {:>8}\n", "Type", "Amount", "Count"));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for (category_type, total) in &self.by_type {
            let label = if category_type.is_empty() {
                "UNCLASSIFIED"
            } else {
                category_type.as_str()
            };
            output.push_str(&format!(
                "{:<30} {:>16} {:>8}\n",
                label,
                total.total.format_with_symbol(currency_symbol),
                total.count
            ));
        }

        output
    }
}
