//! Transaction row display formatting
//!
//! Register view of the statement rows under review, with status and
//! auto-classification indicators.

use crate::models::{CategoryChoices, RowStatus, TransactionRow};

fn status_icon(status: RowStatus) -> &'static str {
    match status {
        RowStatus::Pending => " ",
        RowStatus::Validated => "✓",
        RowStatus::Canceled => "✗",
    }
}

/// Format a single row for the register
///
/// `index` is zero-based; rows are shown numbered from 1.
pub fn format_row(index: usize, row: &TransactionRow, date_format: &str) -> String {
    let auto = if row.auto_classified { "*" } else { " " };
    let category = match (&row.category_type, &row.category_name) {
        (Some(t), Some(n)) => format!("{} / {}", t, n),
        (Some(t), None) => t.clone(),
        (None, Some(n)) => n.clone(),
        (None, None) => "(unclassified)".to_string(),
    };

    format!(
        "{:>4} {} {:10} {:30} {:>12} {:20} {}{}",
        index + 1,
        status_icon(row.status),
        row.date.format(date_format).to_string(),
        truncate(&row.description, 30),
        row.amount,
        truncate(row.display_contact().unwrap_or_default(), 20),
        auto,
        category
    )
}

/// Format the statement as a register
pub fn format_row_register(rows: &[TransactionRow], date_format: &str) -> String {
    if rows.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4} {:1} {:10} {:30} {:>12} {:20}  {}\n",
        "#", "", "Date", "Description", "Amount", "Contact", "Classification"
    ));
    output.push_str(&"-".repeat(100));
    output.push('\n');

    for (i, row) in rows.iter().enumerate() {
        output.push_str(&format_row(i, row, date_format));
        output.push('\n');
    }

    let auto = rows.iter().filter(|r| r.auto_classified).count();
    output.push_str(&format!("\n{} row(s), {} classified by rules (*)\n", rows.len(), auto));

    output
}

/// Format row details, including the categories on offer
pub fn format_row_details(
    index: usize,
    row: &TransactionRow,
    options: &[String],
    choices: &CategoryChoices,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Row:         #{}\n", index + 1));
    output.push_str(&format!("Date:        {}\n", row.date.format("%Y-%m-%d")));
    output.push_str(&format!("Description: {}\n", row.description));
    output.push_str(&format!("Amount:      {}\n", row.amount));
    output.push_str(&format!("Type:        {}\n", row.transaction_type));

    if !row.document.is_empty() {
        output.push_str(&format!("Document:    {}\n", row.document));
    }
    if let Some(contact) = row.display_contact() {
        output.push_str(&format!("Contact:     {}\n", contact));
    }

    output.push_str(&format!(
        "Category:    {} / {}\n",
        row.category_type.as_deref().unwrap_or("-"),
        row.category_name.as_deref().unwrap_or("-")
    ));
    if let Some(memo) = row.memo.as_deref().filter(|m| !m.is_empty()) {
        output.push_str(&format!("Memo:        {}\n", memo));
    }
    output.push_str(&format!("Status:      {}\n", row.status));

    if !options.is_empty() {
        output.push_str(&format!("\nTypes:       {}\n", options.join(", ")));
    }
    if !choices.suggested.is_empty() {
        output.push_str(&format!("Suggested:   {}\n", choices.suggested.join(", ")));
    }

    output
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
