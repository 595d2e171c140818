//! Collaborator traits for statement parsing and notification delivery
//!
//! These are the seams where the engine meets the outside world. Swapping in a
//! real PDF extractor or a different notification channel only requires a new
//! implementation of one of these traits.

use crate::types::{FileHandle, Notification, ReviewError, Transaction};

/// Output of parsing one statement file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStatement {
    /// Transactions extracted from the statement, in statement order
    pub transactions: Vec<Transaction>,

    /// Number of transactions the statement reports
    ///
    /// Equals `transactions.len()` for a real parser. The placeholder parser
    /// reports a count without producing records.
    pub transaction_count: u32,
}

impl ParsedStatement {
    /// Wrap extracted transactions, deriving the count from them
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let transaction_count = u32::try_from(transactions.len()).unwrap_or(u32::MAX);
        ParsedStatement {
            transactions,
            transaction_count,
        }
    }
}

/// Trait for turning an uploaded statement into transactions
///
/// Called once per submitted statement, from the pipeline's completion task.
pub trait StatementParser: Send + Sync {
    /// Parse the statement described by `file`
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::ParseFailed` if the statement cannot be read; the
    /// pipeline then marks the statement as failed.
    fn parse(&self, file: &FileHandle) -> Result<ParsedStatement, ReviewError>;
}

/// Trait for delivering user-facing notifications
///
/// Fire-and-forget: implementations must not block and have no way to report
/// delivery failure back to the engine.
pub trait NotificationSink: Send + Sync {
    /// Deliver a single notification
    fn notify(&self, notification: Notification);
}
