//! Custom error types for SplitLedger
//!
//! This module defines the error hierarchy for the ledger using thiserror.
//! The split engine raises the first four variants; the rest belong to the
//! storage, configuration and export layers around it.

use thiserror::Error;

/// The main error type for SplitLedger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Split policy string that is not one of equal, exact, percentage
    #[error("Invalid split policy: '{0}'. Valid policies: equal, exact, percentage")]
    InvalidPolicy(String),

    /// A participant is missing a field the active policy requires, or the
    /// field is out of range
    #[error("Invalid split data for participant {participant}: {reason}")]
    InvalidSplitData { participant: String, reason: String },

    /// Structurally empty or malformed expense
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    /// A statement row could not be computed
    #[error("Expense {expense}, participant {participant}: {source}")]
    Statement {
        expense: usize,
        participant: String,
        #[source]
        source: Box<LedgerError>,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
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

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Create an `InvalidSplitData` error for a participant
    pub fn split_data(participant: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidSplitData {
            participant: participant.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
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

    /// Check if this error came from the split engine
    pub fn is_split_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPolicy(_)
                | Self::InvalidSplitData { .. }
                | Self::InvalidExpense(_)
                | Self::Statement { .. }
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for SplitLedger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
