//! Statement Review Engine Library
//! # Overview
//!
//! This library ingests uploaded credit-card statements into transactions and
//! drives the review workflow over them: searching, filtering, sorting and
//! approving or disputing each transaction.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, UploadedStatement, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::transaction_store`] - Canonical transaction collection and status transitions
//!   - [`core::ingestion`] - Asynchronous statement ingestion pipeline
//!   - [`core::review`] - Search/filter/sort views and aggregate counts
//!   - [`core::session`] - Store, pipeline and notification sink wired together
//! - [`io`] - Transaction CSV import and export
//! - [`seed`] - Demo dataset
//!
//! # Review Workflow
//!
//! Every transaction carries one of three review statuses:
//!
//! - **Pending**: Freshly ingested, awaiting a decision
//! - **Approved**: Accepted as legitimate
//! - **Disputed**: Challenged by the reviewer
//!
//! No status blocks another; a disputed transaction can still be approved.
//!
//! # Statement Lifecycle
//!
//! - **Processing**: Submitted, waiting for the processing delay to elapse
//! - **Completed**: Parsed, with its transactions added to the store
//! - **Failed**: The parser or the store rejected the statement

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod seed;
pub mod types;

pub use core::{
    FlagFilter, NotificationSink, PipelineConfig, ReviewQuery, ReviewSession, SortOrder,
    StatementParser, StatementPipeline, TransactionStore,
};
pub use io::write_transactions_csv;
pub use types::{
    DashboardStats, FileHandle, Notification, NotificationKind, ReviewError, ReviewStats,
    ReviewStatus, StatementStatus, Transaction, TransactionId, UploadedStatement,
};
