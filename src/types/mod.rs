//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Reviewed transactions and their workflow status
//! - `statement`: Uploaded statements, file handles and ingestion status
//! - `notification`: User-facing notification events
//! - `stats`: Derived aggregate counts
//! - `error`: Error types for the review engine

pub mod error;
pub mod notification;
pub mod statement;
pub mod stats;
pub mod transaction;

pub use error::ReviewError;
pub use notification::{Notification, NotificationKind};
pub use statement::{
    FileHandle, StatementId, StatementStatus, UploadedStatement, ADVISORY_SIZE_LIMIT_BYTES,
    PDF_MIME_TYPE,
};
pub use stats::{DashboardStats, ReviewStats};
pub use transaction::{ReviewStatus, Transaction, TransactionId};
