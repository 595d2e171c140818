//! Asynchronous statement ingestion
//!
//! This module provides the `StatementPipeline`, which accepts uploaded
//! statement files, tracks them through their ingestion lifecycle and
//! materializes their transactions into the shared `TransactionStore`.
//!
//! # Lifecycle
//!
//! ```text
//! submit() ──► Processing ──(processing delay)──► Completed { transaction_count }
//!                                   └───────────► Failed { error }
//! ```
//!
//! `submit` validates and records the statement synchronously, then schedules
//! a completion task on the tokio runtime. Each completion task runs exactly
//! once, no earlier than the configured delay. Tasks for different statements
//! may finish in any order.
//!
//! # Atomicity
//!
//! The completion step appends the parsed transactions and settles the
//! statement while holding the statement ledger's write lock. `snapshot()`
//! reads both collections under the ledger's read lock, so it never sees
//! transactions of a statement that still looks `Processing`.

use crate::core::traits::{NotificationSink, ParsedStatement, StatementParser};
use crate::core::transaction_store::TransactionStore;
use crate::types::{
    FileHandle, Notification, ReviewError, ReviewStatus, StatementStatus, Transaction,
    UploadedStatement, ADVISORY_SIZE_LIMIT_BYTES,
};
use chrono::Utc;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Message sent to the notification sink when a statement completes
pub const COMPLETION_MESSAGE: &str = "Statement processed successfully!";

/// Configuration for statement ingestion
///
/// Controls how long a statement stays `Processing` and the range of counts
/// the placeholder parser reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Time between submission and completion
    pub processing_delay: Duration,
    /// Smallest transaction count the placeholder parser reports
    pub min_synthetic_count: u32,
    /// Largest transaction count the placeholder parser reports
    pub max_synthetic_count: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(2000),
            min_synthetic_count: 5,
            max_synthetic_count: 24,
        }
    }
}

impl PipelineConfig {
    /// Create a new PipelineConfig with custom values
    ///
    /// A zero minimum count, or a maximum below the minimum, falls back to the
    /// default range with a warning.
    pub fn new(processing_delay: Duration, min_synthetic_count: u32, max_synthetic_count: u32) -> Self {
        let default = Self::default();

        let (min_synthetic_count, max_synthetic_count) =
            if min_synthetic_count == 0 || max_synthetic_count < min_synthetic_count {
                warn!(
                    "Invalid synthetic count range ({}..={}), using default ({}..={})",
                    min_synthetic_count,
                    max_synthetic_count,
                    default.min_synthetic_count,
                    default.max_synthetic_count
                );
                (default.min_synthetic_count, default.max_synthetic_count)
            } else {
                (min_synthetic_count, max_synthetic_count)
            };

        Self {
            processing_delay,
            min_synthetic_count,
            max_synthetic_count,
        }
    }
}

/// Statements and transactions observed at a single point in time
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSnapshot {
    /// Statements, most recently submitted first
    pub statements: Vec<UploadedStatement>,
    /// Transactions in append order
    pub transactions: Vec<Transaction>,
}

/// State shared between the pipeline handle and its completion tasks
struct Ledger {
    statements: RwLock<Vec<UploadedStatement>>,
    store: Arc<TransactionStore>,
    parser: Arc<dyn StatementParser>,
    sink: Arc<dyn NotificationSink>,
}

/// Outcome of a completion step, reported after the ledger lock is released
enum Settlement {
    Completed { transaction_count: u32 },
    Failed(ReviewError),
}

impl Ledger {
    /// Parse, materialize and settle one statement
    fn complete(&self, statement_id: &str, file: &FileHandle) {
        // Parsing may be slow; keep it outside the ledger lock
        let parsed = self.parser.parse(file).and_then(Self::admit);

        let settlement = {
            let mut statements = self
                .statements
                .write()
                .unwrap_or_else(PoisonError::into_inner);

            let Some(statement) = statements.iter_mut().find(|s| s.id == statement_id) else {
                error!(statement_id, "completion fired for unknown statement");
                return;
            };

            let settlement = match parsed {
                Ok(parsed) => match self.store.append(parsed.transactions) {
                    Ok(()) => Settlement::Completed {
                        transaction_count: parsed.transaction_count,
                    },
                    Err(e) => Settlement::Failed(e),
                },
                Err(e) => Settlement::Failed(e),
            };

            let settled = match &settlement {
                Settlement::Completed { transaction_count } => {
                    statement.complete(*transaction_count)
                }
                Settlement::Failed(e) => statement.fail(e.to_string()),
            };
            if let Err(e) = settled {
                error!(statement_id, "statement settled twice: {}", e);
                return;
            }

            settlement
        };

        match settlement {
            Settlement::Completed { transaction_count } => {
                info!(statement_id, filename = %file.name, transaction_count, "statement completed");
                self.sink.notify(Notification::success(COMPLETION_MESSAGE));
            }
            Settlement::Failed(e) => {
                error!(statement_id, filename = %file.name, "statement failed: {}", e);
                let message = if e.is_user_visible() {
                    format!("Failed to process {}: {}", file.name, e)
                } else {
                    format!("Failed to process {}", file.name)
                };
                self.sink.notify(Notification::error(message));
            }
        }
    }

    /// Prepare parsed records for the store
    ///
    /// Every ingested transaction starts out `Pending`, whatever status the
    /// parser attached. A record with an out-of-range field rejects the whole
    /// statement.
    fn admit(mut parsed: ParsedStatement) -> Result<ParsedStatement, ReviewError> {
        for tx in &mut parsed.transactions {
            tx.validate()?;
            tx.status = ReviewStatus::Pending;
        }
        Ok(parsed)
    }
}

/// Ingestion pipeline for uploaded statements
///
/// Cheap to clone; clones share the same statement ledger, store and task
/// tracker.
#[derive(Clone)]
pub struct StatementPipeline {
    ledger: Arc<Ledger>,
    runtime: Handle,
    tracker: TaskTracker,
    processing_delay: Duration,
}

impl StatementPipeline {
    /// Create a new pipeline writing into `store`
    ///
    /// # Arguments
    ///
    /// * `store` - Transaction store that receives parsed transactions
    /// * `parser` - Collaborator that extracts transactions from a statement
    /// * `sink` - Receives one notification per completed or failed statement
    /// * `config` - Processing delay
    /// * `runtime` - Runtime the completion tasks are spawned on
    pub fn new(
        store: Arc<TransactionStore>,
        parser: Arc<dyn StatementParser>,
        sink: Arc<dyn NotificationSink>,
        config: &PipelineConfig,
        runtime: Handle,
    ) -> Self {
        StatementPipeline {
            ledger: Arc::new(Ledger {
                statements: RwLock::new(Vec::new()),
                store,
                parser,
                sink,
            }),
            runtime,
            tracker: TaskTracker::new(),
            processing_delay: config.processing_delay,
        }
    }

    /// Load statements that were ingested before this pipeline existed
    ///
    /// They are placed after any statement already tracked, keeping the
    /// given order.
    pub fn preload(&self, statements: Vec<UploadedStatement>) {
        self.ledger
            .statements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(statements);
    }

    /// Submit a statement file for ingestion
    ///
    /// Records a `Processing` statement at the front of the list and
    /// schedules its completion. Never waits for the completion.
    ///
    /// # Returns
    ///
    /// A copy of the newly recorded statement.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::UnsupportedFormat` if the file is not a PDF;
    /// nothing is recorded or scheduled.
    pub fn submit(&self, file: FileHandle) -> Result<UploadedStatement, ReviewError> {
        if !file.is_pdf() {
            warn!(filename = %file.name, mime_type = %file.mime_type, "rejecting non-PDF upload");
            return Err(ReviewError::unsupported_format(&file.name, &file.mime_type));
        }
        if file.size_bytes > ADVISORY_SIZE_LIMIT_BYTES {
            warn!(
                filename = %file.name,
                size_bytes = file.size_bytes,
                "upload exceeds the advisory size limit"
            );
        }

        let statement =
            UploadedStatement::processing(Uuid::new_v4().to_string(), &file.name, Utc::now());

        self.ledger
            .statements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, statement.clone());

        info!(statement_id = %statement.id, filename = %file.name, "statement submitted");

        let ledger = Arc::clone(&self.ledger);
        let delay = self.processing_delay;
        let statement_id = statement.id.clone();
        self.tracker.spawn_on(
            async move {
                tokio::time::sleep(delay).await;
                ledger.complete(&statement_id, &file);
            },
            &self.runtime,
        );

        Ok(statement)
    }

    /// All statements, most recently submitted first
    pub fn list(&self) -> Vec<UploadedStatement> {
        self.ledger
            .statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get a copy of a single statement
    pub fn get(&self, id: &str) -> Option<UploadedStatement> {
        self.ledger
            .statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Statements and transactions read together
    ///
    /// No completion can land between the two reads.
    pub fn snapshot(&self) -> PipelineSnapshot {
        let statements = self
            .ledger
            .statements
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        PipelineSnapshot {
            statements: statements.clone(),
            transactions: self.ledger.store.all(),
        }
    }

    /// Number of statements that finished successfully
    pub fn completed_count(&self) -> usize {
        self.count_with_status(StatementStatus::Completed)
    }

    /// Number of statements still waiting for completion
    pub fn in_flight(&self) -> usize {
        self.count_with_status(StatementStatus::Processing)
    }

    fn count_with_status(&self, status: StatementStatus) -> usize {
        self.ledger
            .statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.status == status)
            .count()
    }

    /// Wait until every scheduled completion has run
    ///
    /// Submissions made while draining are waited for as well. The pipeline
    /// keeps accepting submissions afterwards.
    pub async fn drain(&self) {
        debug!(pending = self.tracker.len(), "draining statement pipeline");
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Current lifecycle stage of a statement
    pub fn status_of(&self, id: &str) -> Option<StatementStatus> {
        self.get(id).map(|s| s.status)
    }
}
