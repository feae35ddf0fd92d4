//! Classification rule model
//!
//! A rule pairs a match predicate (description substrings, transaction type,
//! contact) with the classification it writes onto matching rows.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::RuleId;
use super::transaction::TransactionType;

/// A classification rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier; generated for rules imported without one
    #[serde(default)]
    pub id: RuleId,

    /// Every listed substring must occur in the description
    #[serde(default, alias = "descricao_contain")]
    pub description_contains: Vec<String>,

    /// Required transaction type; `Undefined` matches any
    #[serde(default)]
    pub transaction_type: TransactionType,

    /// Substring the row's contact label must contain
    #[serde(default, alias = "contato_igual", deserialize_with = "blank_as_none")]
    pub contact_equals: Option<String>,

    #[serde(default, alias = "tipo")]
    pub category_type: String,

    #[serde(default, alias = "categoria")]
    pub category_name: String,

    #[serde(default, alias = "memo_rule")]
    pub memo: Option<String>,
}

impl Rule {
    /// Create a rule that matches on description substrings
    pub fn new(
        description_contains: Vec<String>,
        category_type: impl Into<String>,
        category_name: impl Into<String>,
    ) -> Self {
        Self {
            id: RuleId::new(),
            description_contains,
            transaction_type: TransactionType::Undefined,
            contact_equals: None,
            category_type: category_type.into(),
            category_name: category_name.into(),
            memo: None,
        }
    }

    /// Build a rule from raw form input
    ///
    /// Description terms are comma-separated; blank optional fields become
    /// `None` and a blank transaction type becomes the wildcard.
    pub fn from_form(form: &RuleForm) -> Result<Self, RuleValidationError> {
        let transaction_type = form
            .transaction_type
            .parse()
            .map_err(RuleValidationError::InvalidValue)?;

        Ok(Self {
            id: RuleId::new(),
            description_contains: split_terms(&form.description_contains),
            transaction_type,
            contact_equals: non_blank(&form.contact_equals),
            category_type: form.category_type.trim().to_string(),
            category_name: form.category_name.trim().to_string(),
            memo: non_blank(&form.memo),
        })
    }

    /// Builder: require a transaction type
    pub fn with_transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// Builder: require a contact substring
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact_equals = Some(contact.into());
        self
    }

    /// Builder: memo written on match
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Apply a single field-level edit
    pub fn set_field(&mut self, field: RuleField, value: &str) -> Result<(), RuleValidationError> {
        match field {
            RuleField::DescriptionContains => self.description_contains = split_terms(value),
            RuleField::TransactionType => {
                self.transaction_type = value.parse().map_err(RuleValidationError::InvalidValue)?
            }
            RuleField::ContactEquals => self.contact_equals = non_blank(value),
            RuleField::CategoryType => self.category_type = value.trim().to_string(),
            RuleField::CategoryName => self.category_name = value.trim().to_string(),
            RuleField::Memo => self.memo = non_blank(value),
        }
        Ok(())
    }

    /// Validate the rule
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if self.category_type.trim().is_empty() && self.category_name.trim().is_empty() {
            return Err(RuleValidationError::NoClassification);
        }

        if self.description_contains.iter().any(|t| t.trim().is_empty()) {
            return Err(RuleValidationError::BlankTerm);
        }

        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms = if self.description_contains.is_empty() {
            "*".to_string()
        } else {
            self.description_contains.join(" + ")
        };
        write!(f, "{} => {} / {}", terms, self.category_type, self.category_name)
    }
}

/// Raw rule form input, one string per field
#[derive(Debug, Clone, Default)]
pub struct RuleForm {
    pub description_contains: String,
    pub transaction_type: String,
    pub contact_equals: String,
    pub category_type: String,
    pub category_name: String,
    pub memo: String,
}

/// Editable rule fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    DescriptionContains,
    TransactionType,
    ContactEquals,
    CategoryType,
    CategoryName,
    Memo,
}

impl FromStr for RuleField {
    type Err = RuleValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "description_contains" | "descricao_contain" | "description" => {
                Ok(Self::DescriptionContains)
            }
            "transaction_type" | "type" => Ok(Self::TransactionType),
            "contact_equals" | "contato_igual" | "contact" => Ok(Self::ContactEquals),
            "category_type" | "tipo" => Ok(Self::CategoryType),
            "category_name" | "categoria" | "category" => Ok(Self::CategoryName),
            "memo" | "memo_rule" => Ok(Self::Memo),
            other => Err(RuleValidationError::UnknownField(other.to_string())),
        }
    }
}

/// Validation errors for rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValidationError {
    NoClassification,
    BlankTerm,
    UnknownField(String),
    InvalidValue(String),
}

impl fmt::Display for RuleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoClassification => {
                write!(f, "Rule must set a category type or a category name")
            }
            Self::BlankTerm => write!(f, "Description terms cannot be blank"),
            Self::UnknownField(field) => write!(f, "Unknown rule field: '{}'", field),
            Self::InvalidValue(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RuleValidationError {}

fn split_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Older rule files write an unset contact as `""`
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(non_blank))
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
