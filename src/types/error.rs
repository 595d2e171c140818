//! Error types for the statement review engine
//!
//! This module defines all error types that can occur while ingesting
//! statements and reviewing transactions.
//!
//! # Error Categories
//!
//! - **Intake Errors**: Unsupported file formats, unreadable files
//! - **Store Errors**: Duplicate transaction IDs, unknown transaction IDs
//! - **Ingestion Errors**: Parser failures, statements settled twice
//! - **CSV Errors**: Malformed transaction exports

use super::statement::StatementStatus;
use thiserror::Error;

/// Main error type for the review engine
///
/// Each variant carries enough context to diagnose the failure without
/// access to the engine's internal state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReviewError {
    /// A file with a non-PDF media type was submitted for ingestion
    ///
    /// User-visible and recoverable by resubmitting a PDF.
    #[error("Unsupported format for '{filename}': expected application/pdf, got '{mime_type}'")]
    UnsupportedFormat {
        /// Name of the rejected file
        filename: String,
        /// Media type reported by the intake boundary
        mime_type: String,
    },

    /// A transaction ID is already present in the store
    ///
    /// This is an internal invariant violation and points at a defect in
    /// whoever produced the records.
    #[error("Duplicate transaction ID '{id}'")]
    DuplicateId {
        /// The duplicated transaction ID
        id: String,
    },

    /// No transaction with the given ID exists
    ///
    /// Usually means the caller holds a stale view; refreshing it recovers.
    #[error("Transaction '{id}' not found for {operation}")]
    TransactionNotFound {
        /// Transaction ID that was not found
        id: String,
        /// Operation that failed
        operation: String,
    },

    /// A statement was completed or failed after it had already settled
    #[error("Statement '{id}' is already {status}")]
    StatementNotProcessing {
        /// Statement ID
        id: String,
        /// Status the statement had already reached
        status: StatementStatus,
    },

    /// The parser collaborator could not extract transactions
    #[error("Failed to parse statement '{filename}': {message}")]
    ParseFailed {
        /// Name of the statement file
        filename: String,
        /// Description of the parser failure
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A field in a transaction record holds an invalid value
    #[error("Invalid {field} '{value}' for transaction '{id}'")]
    InvalidField {
        /// Transaction ID of the offending record
        id: String,
        /// Name of the field
        field: String,
        /// The rejected raw value
        value: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },
}

impl From<std::io::Error> for ReviewError {
    fn from(error: std::io::Error) -> Self {
        ReviewError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ReviewError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReviewError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ReviewError {
    /// Create an UnsupportedFormat error
    pub fn unsupported_format(filename: &str, mime_type: &str) -> Self {
        ReviewError::UnsupportedFormat {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
        }
    }

    /// Create a DuplicateId error
    pub fn duplicate_id(id: &str) -> Self {
        ReviewError::DuplicateId { id: id.to_string() }
    }

    /// Create a TransactionNotFound error
    pub fn not_found(id: &str, operation: &str) -> Self {
        ReviewError::TransactionNotFound {
            id: id.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Create a StatementNotProcessing error
    pub fn statement_not_processing(id: &str, status: StatementStatus) -> Self {
        ReviewError::StatementNotProcessing {
            id: id.to_string(),
            status,
        }
    }

    /// Create a ParseFailed error
    pub fn parse_failed(filename: &str, message: impl Into<String>) -> Self {
        ReviewError::ParseFailed {
            filename: filename.to_string(),
            message: message.into(),
        }
    }

    /// Create an InvalidField error
    pub fn invalid_field(id: &str, field: &str, value: &str) -> Self {
        ReviewError::InvalidField {
            id: id.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Whether the error should reach the end user
    ///
    /// Duplicate IDs and double settlement are engine defects; everything
    /// else describes something the user can act on.
    pub fn is_user_visible(&self) -> bool {
        !matches!(
            self,
            ReviewError::DuplicateId { .. } | ReviewError::StatementNotProcessing { .. }
        )
    }
}
