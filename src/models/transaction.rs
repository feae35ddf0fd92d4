//! Transaction row model
//!
//! One bank-statement line item under review, together with its current
//! classification (category type/name, memo) and review status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

/// Direction of a statement entry
///
/// `Undefined` doubles as the wildcard value on rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransactionType {
    #[serde(alias = "credit", alias = "Crédito", alias = "Credito")]
    Credit,
    #[serde(alias = "debit", alias = "Débito", alias = "Debito")]
    Debit,
    #[default]
    #[serde(alias = "undefined", alias = "Indefinido", alias = "")]
    Undefined,
}

impl TransactionType {
    /// All transaction types in display order
    pub fn all() -> &'static [TransactionType] {
        &[Self::Credit, Self::Debit, Self::Undefined]
    }

    /// Whether this value acts as a wildcard when used in a rule
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Canonical label used in exports and taxonomy keys
    pub fn label(&self) -> &'static str {
        match self {
            Self::Credit => "Credit",
            Self::Debit => "Debit",
            Self::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" | "crédito" | "credito" | "c" => Ok(Self::Credit),
            "debit" | "débito" | "debito" | "d" => Ok(Self::Debit),
            "undefined" | "indefinido" | "" | "any" => Ok(Self::Undefined),
            other => Err(format!("Unknown transaction type: '{}'", other)),
        }
    }
}

/// Review status of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// Awaiting review; the only status rules may classify
    #[default]
    #[serde(alias = "")]
    Pending,
    /// Confirmed by the user
    Validated,
    /// Discarded by the user
    #[serde(alias = "cancelled")]
    Canceled,
}

impl RowStatus {
    /// Check if the row is locked against automatic classification
    pub fn is_locked(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Validated => write!(f, "Validated"),
            Self::Canceled => write!(f, "Canceled"),
        }
    }
}

impl FromStr for RowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "" => Ok(Self::Pending),
            "validated" | "valid" => Ok(Self::Validated),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            other => Err(format!("Unknown status: '{}'", other)),
        }
    }
}

/// A bank-statement transaction under review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    /// Statement date
    pub date: NaiveDate,

    /// Statement description as printed by the bank
    pub description: String,

    /// Amount (positive for inflow, negative for outflow)
    pub amount: Money,

    /// Credit, debit or undefined
    #[serde(default)]
    pub transaction_type: TransactionType,

    /// Bank document number
    #[serde(default)]
    pub document: String,

    /// Contact label resolved by the import pipeline
    #[serde(default)]
    pub contact: Option<String>,

    /// Editable contact field; rules with a contact criterion write here
    #[serde(default)]
    pub contact_override: Option<String>,

    #[serde(default)]
    pub category_type: Option<String>,

    #[serde(default)]
    pub category_name: Option<String>,

    #[serde(default)]
    pub memo: Option<String>,

    #[serde(default)]
    pub status: RowStatus,

    /// Current category values came from rule application
    #[serde(default)]
    pub auto_classified: bool,
}

impl TransactionRow {
    /// Create a new pending, unclassified row
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            transaction_type,
            document: String::new(),
            contact: None,
            contact_override: None,
            category_type: None,
            category_name: None,
            memo: None,
            status: RowStatus::Pending,
            auto_classified: false,
        }
    }

    /// Attach a resolved contact label
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// The contact shown to the user: the edited value if any, else the resolved one
    pub fn display_contact(&self) -> Option<&str> {
        self.contact_override
            .as_deref()
            .or(self.contact.as_deref())
    }

    /// Check if rules may classify this row
    pub fn is_pending(&self) -> bool {
        self.status == RowStatus::Pending
    }

    /// Manually set the category; clears the auto-classified flag
    pub fn set_category(&mut self, category_type: Option<String>, category_name: Option<String>) {
        self.category_type = category_type.filter(|s| !s.is_empty());
        self.category_name = category_name.filter(|s| !s.is_empty());
        self.auto_classified = false;
    }

    /// Move the row to a new review status
    ///
    /// Pending may become Validated or Canceled; a decided row can only go
    /// back to Pending through an explicit reset.
    pub fn transition(&mut self, next: RowStatus) -> Result<(), StatusTransitionError> {
        match (self.status, next) {
            (RowStatus::Pending, RowStatus::Validated | RowStatus::Canceled) => {
                self.status = next;
                Ok(())
            }
            (_, RowStatus::Pending) => {
                self.status = RowStatus::Pending;
                Ok(())
            }
            (from, to) if from == to => Ok(()),
            (from, to) => Err(StatusTransitionError { from, to }),
        }
    }
}

impl fmt::Display for TransactionRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// A status change that would skip the explicit reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransitionError {
    pub from: RowStatus,
    pub to: RowStatus,
}

impl fmt::Display for StatusTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot change status from {} to {} without resetting to Pending first",
            self.from, self.to
        )
    }
}

impl std::error::Error for StatusTransitionError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_row() -> TransactionRow {
        TransactionRow::new(
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            "PIX RECEBIDO ACME",
            Money::from_cents(15000),
            TransactionType::Credit,
        )
    }

    #[test]
    fn test_new_row_is_pending() {
        let row = test_row();
        assert!(row.is_pending());
        assert!(!row.auto_classified);
        assert!(row.category_type.is_none());
    }

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!("Crédito".parse::<TransactionType>().unwrap(), TransactionType::Credit);
        assert_eq!("DEBIT".parse::<TransactionType>().unwrap(), TransactionType::Debit);
        assert_eq!("".parse::<TransactionType>().unwrap(), TransactionType::Undefined);
        assert!("sideways".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_transaction_type_serde_aliases() {
        let t: TransactionType = serde_json::from_str("\"Débito\"").unwrap();
        assert_eq!(t, TransactionType::Debit);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"Debit\"");
    }

    #[test]
    fn test_status_transitions() {
        let mut row = test_row();
        row.transition(RowStatus::Validated).unwrap();
        assert_eq!(row.status, RowStatus::Validated);

        // One-way until reset
        let err = row.transition(RowStatus::Canceled).unwrap_err();
        assert_eq!(err.from, RowStatus::Validated);
        assert_eq!(row.status, RowStatus::Validated);

        row.transition(RowStatus::Pending).unwrap();
        row.transition(RowStatus::Canceled).unwrap();
        assert_eq!(row.status, RowStatus::Canceled);
    }

    #[test]
    fn test_display_contact_prefers_override() {
        let mut row = test_row().with_contact("ACME COMERCIO LTDA");
        assert_eq!(row.display_contact(), Some("ACME COMERCIO LTDA"));
        row.contact_override = Some("ACME".into());
        assert_eq!(row.display_contact(), Some("ACME"));
    }

    #[test]
    fn test_set_category_clears_auto_flag() {
        let mut row = test_row();
        row.auto_classified = true;
        row.set_category(Some("Receipts".into()), Some(String::new()));
        assert_eq!(row.category_type.as_deref(), Some("Receipts"));
        assert!(row.category_name.is_none());
        assert!(!row.auto_classified);
    }

    #[test]
    fn test_deserialize_minimal_row() {
        let json = r#"{"date": "2025-03-10", "description": "TARIFA", "amount": "-12,90"}"#;
        let row: TransactionRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.amount.cents(), -1290);
        assert_eq!(row.transaction_type, TransactionType::Undefined);
        assert_eq!(row.status, RowStatus::Pending);
    }
}
