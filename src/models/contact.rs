//! Contact model
//!
//! Counterparties known to the review, keyed loosely by tax id. Duplicates
//! are allowed; the list is kept in insertion order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A counterparty contact
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contact {
    /// CPF/CNPJ as printed, punctuation preserved
    #[serde(default, alias = "cpf_cnpj")]
    pub tax_id: String,

    #[serde(default, alias = "razao_social")]
    pub legal_name: String,

    #[serde(default, alias = "nome_fantasia")]
    pub trade_name: String,

    /// Label shown in the review and matched by rules
    #[serde(default, alias = "nome")]
    pub display_name: String,
}

impl Contact {
    /// Create a new contact
    pub fn new(tax_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            tax_id: tax_id.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Builder: set the legal name
    pub fn with_legal_name(mut self, legal_name: impl Into<String>) -> Self {
        self.legal_name = legal_name.into();
        self
    }

    /// Builder: set the trade name
    pub fn with_trade_name(mut self, trade_name: impl Into<String>) -> Self {
        self.trade_name = trade_name.into();
        self
    }

    /// Tax id with punctuation stripped, for comparisons
    pub fn normalized_tax_id(&self) -> String {
        self.tax_id.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Check whether a user-supplied reference names this contact
    ///
    /// Matches the tax id (with or without punctuation) or the display
    /// name, case-insensitively.
    pub fn matches_reference(&self, reference: &str) -> bool {
        let reference = reference.trim();
        if reference.is_empty() {
            return false;
        }

        let digits: String = reference.chars().filter(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() && digits == self.normalized_tax_id() {
            return true;
        }

        self.display_name.trim().to_lowercase() == reference.to_lowercase()
    }

    /// Validate the contact
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.tax_id.trim().is_empty() && self.display_name.trim().is_empty() {
            return Err(ContactValidationError::Empty);
        }
        Ok(())
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tax_id.is_empty() {
            write!(f, "{}", self.display_name)
        } else {
            write!(f, "{} ({})", self.display_name, self.tax_id)
        }
    }
}

/// Validation errors for contacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    Empty,
}

impl fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Contact needs a tax id or a display name"),
        }
    }
}

impl std::error::Error for ContactValidationError {}
