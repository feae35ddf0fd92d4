//! Custom error types for statement review
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for statement review operations
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed CSV or JSON input on import
    #[error("Parse error: {0}")]
    Parse(String),

    /// Validation errors (unknown rule field, snapshot mismatch, status transition)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors, including empty remote state
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A persistence request (save/load/clean) failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl ReviewError {
    /// Create a "not found" error for rules
    pub fn rule_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Rule",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for a stored resource
    pub fn resource_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Stored state",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transaction rows
    pub fn row_not_found(index: usize) -> Self {
        Self::NotFound {
            entity_type: "Transaction row",
            identifier: format!("#{}", index + 1),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for ReviewError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReviewError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for ReviewError {
    fn from(err: csv::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for statement review operations
pub type ReviewResult<T> = Result<T, ReviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReviewError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = ReviewError::rule_not_found("rul-1234abcd");
        assert_eq!(err.to_string(), "Rule not found: rul-1234abcd");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_row_not_found_is_one_based() {
        let err = ReviewError::row_not_found(0);
        assert_eq!(err.to_string(), "Transaction row not found: #1");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let review_err: ReviewError = io_err.into();
        assert!(matches!(review_err, ReviewError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let review_err: ReviewError = json_err.into();
        assert!(matches!(review_err, ReviewError::Json(_)));
        assert!(!review_err.is_validation());
    }
}
