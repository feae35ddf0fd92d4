//! Reports module for statement review
//!
//! Provides the transaction report: the reviewed statement exported as CSV,
//! with a per-type summary for the terminal.

pub mod transaction_report;

pub use transaction_report::{ReportLine, TransactionReport, TypeTotal, REPORT_COLUMNS};
