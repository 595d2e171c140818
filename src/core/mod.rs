//! Core business logic module
//!
//! This module contains the review and ingestion components:
//! - `traits` - Collaborator seams (statement parser, notification sink)
//! - `transaction_store` - Canonical transaction collection and status transitions
//! - `ingestion` - Asynchronous statement ingestion lifecycle
//! - `review` - Pure search/filter/sort views and aggregate counts
//! - `session` - Wires store, pipeline and sink together for a UI
//! - `parser` - Placeholder and pre-parsed statement parsers
//! - `notifications` - Notification sink implementations

pub mod ingestion;
pub mod notifications;
pub mod parser;
pub mod review;
pub mod session;
pub mod traits;
pub mod transaction_store;

pub use ingestion::{PipelineConfig, PipelineSnapshot, StatementPipeline};
pub use notifications::{ChannelSink, CollectingSink, TracingSink};
pub use parser::{PlaceholderParser, PreparsedStatements};
pub use review::{aggregate, review, FlagFilter, ReviewQuery, SortOrder};
pub use session::ReviewSession;
pub use traits::{NotificationSink, ParsedStatement, StatementParser};
pub use transaction_store::TransactionStore;
