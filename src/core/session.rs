//! Review session orchestration
//!
//! This module provides the `ReviewSession`, which wires one transaction store,
//! one ingestion pipeline and one notification sink together and exposes the
//! operations a user interface drives.
//!
//! The session is where user-facing feedback is produced:
//! - rejected uploads and stale transaction references become `Error`
//!   notifications
//! - approvals are confirmed with a `Success` notification, disputes with an
//!   `Info` one
//!
//! The store itself never notifies on transitions.

use crate::core::ingestion::{PipelineConfig, PipelineSnapshot, StatementPipeline};
use crate::core::parser::PlaceholderParser;
use crate::core::review::{aggregate, review, ReviewQuery};
use crate::core::traits::{NotificationSink, StatementParser};
use crate::core::transaction_store::TransactionStore;
use crate::seed::{seed_statements, seed_transactions};
use crate::types::{
    DashboardStats, FileHandle, Notification, ReviewError, ReviewStats, ReviewStatus,
    StatementStatus, Transaction, UploadedStatement,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::warn;

/// A single user's review workspace
#[derive(Clone)]
pub struct ReviewSession {
    store: Arc<TransactionStore>,
    pipeline: StatementPipeline,
    sink: Arc<dyn NotificationSink>,
}

impl ReviewSession {
    /// Create a session around an existing store and parser
    pub fn new(
        store: Arc<TransactionStore>,
        parser: Arc<dyn StatementParser>,
        sink: Arc<dyn NotificationSink>,
        config: &PipelineConfig,
        runtime: Handle,
    ) -> Self {
        let pipeline = StatementPipeline::new(
            Arc::clone(&store),
            parser,
            Arc::clone(&sink),
            config,
            runtime,
        );
        ReviewSession {
            store,
            pipeline,
            sink,
        }
    }

    /// Create an empty session using the placeholder parser
    pub fn with_placeholder_parser(
        sink: Arc<dyn NotificationSink>,
        config: &PipelineConfig,
        runtime: Handle,
    ) -> Self {
        let parser = Arc::new(PlaceholderParser::new(
            config.min_synthetic_count,
            config.max_synthetic_count,
        ));
        Self::new(
            Arc::new(TransactionStore::new()),
            parser,
            sink,
            config,
            runtime,
        )
    }

    /// Create a session pre-loaded with the demo dataset
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::DuplicateId` if the demo data repeats an ID.
    pub fn seeded(
        sink: Arc<dyn NotificationSink>,
        config: &PipelineConfig,
        runtime: Handle,
    ) -> Result<Self, ReviewError> {
        let session = Self::with_placeholder_parser(sink, config, runtime);
        session.store.append(seed_transactions())?;
        session.pipeline.preload(seed_statements());
        Ok(session)
    }

    /// Submit a statement file for ingestion
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::UnsupportedFormat` for non-PDF files, after
    /// sending an `Error` notification.
    pub fn submit(&self, file: FileHandle) -> Result<UploadedStatement, ReviewError> {
        self.pipeline.submit(file).inspect_err(|e| self.report(e))
    }

    /// Record a reviewer decision on a transaction
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::TransactionNotFound` for unknown IDs, after
    /// sending an `Error` notification.
    pub fn transition(
        &self,
        id: &str,
        new_status: ReviewStatus,
    ) -> Result<Transaction, ReviewError> {
        let updated = self
            .store
            .transition(id, new_status)
            .inspect_err(|e| self.report(e))?;

        match new_status {
            ReviewStatus::Approved => self
                .sink
                .notify(Notification::success("Transaction approved successfully")),
            ReviewStatus::Disputed => self
                .sink
                .notify(Notification::info("Transaction disputed successfully")),
            ReviewStatus::Pending => {}
        }

        Ok(updated)
    }

    /// Send user-visible errors to the sink; engine defects only get logged
    fn report(&self, error: &ReviewError) {
        if error.is_user_visible() {
            self.sink.notify(Notification::error(error.to_string()));
        } else {
            warn!("internal error not shown to user: {}", error);
        }
    }

    /// Review view over the current transactions
    pub fn review(&self, query: &ReviewQuery) -> Vec<Transaction> {
        let snapshot = self.store.all();
        review(&snapshot, query).into_iter().cloned().collect()
    }

    /// Counts over the current transactions
    pub fn stats(&self) -> ReviewStats {
        aggregate(&self.store.all())
    }

    /// Dashboard numbers derived from the current state
    pub fn dashboard(&self) -> DashboardStats {
        let PipelineSnapshot {
            statements,
            transactions,
        } = self.pipeline.snapshot();

        DashboardStats {
            total_statements: statements
                .iter()
                .filter(|s| s.status == StatementStatus::Completed)
                .count(),
            flagged_transactions: aggregate(&transactions).flagged_count,
            disputes_resolved: self.store.dispute_tally(),
        }
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.store.all()
    }

    pub fn statements(&self) -> Vec<UploadedStatement> {
        self.pipeline.list()
    }

    /// Statements and transactions read together
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.pipeline.snapshot()
    }

    /// Wait for every submitted statement to finish ingestion
    pub async fn drain(&self) {
        self.pipeline.drain().await;
    }

    pub fn store(&self) -> &Arc<TransactionStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifications::CollectingSink;
    use crate::core::review::{FlagFilter, SortOrder};
    use crate::types::{NotificationKind, PDF_MIME_TYPE};
    use std::time::Duration;

    fn seeded_session() -> (ReviewSession, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let config = PipelineConfig::default();
        let session = ReviewSession::seeded(sink.clone(), &config, Handle::current()).unwrap();
        (session, sink)
    }

    #[tokio::test]
    async fn test_seeded_dashboard_matches_demo_numbers() {
        let (session, _sink) = seeded_session();
        assert_eq!(
            session.dashboard(),
            DashboardStats {
                total_statements: 2,
                flagged_transactions: 3,
                disputes_resolved: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_transition_notifies_like_review_screen() {
        let (session, sink) = seeded_session();

        session.transition("1", ReviewStatus::Approved).unwrap();
        session.transition("3", ReviewStatus::Disputed).unwrap();
        session.transition("3", ReviewStatus::Pending).unwrap();

        assert_eq!(
            sink.notifications(),
            vec![
                Notification::success("Transaction approved successfully"),
                Notification::info("Transaction disputed successfully"),
            ]
        );
        assert_eq!(session.dashboard().disputes_resolved, 2);
    }

    #[tokio::test]
    async fn test_unknown_transaction_reports_error() {
        let (session, sink) = seeded_session();
        let before = session.transactions();

        let result = session.transition("nonexistent-id", ReviewStatus::Approved);
        assert!(matches!(
            result,
            Err(ReviewError::TransactionNotFound { .. })
        ));
        assert_eq!(session.transactions(), before);
        assert_eq!(sink.count_of(NotificationKind::Error), 1);
    }

    #[tokio::test]
    async fn test_rejected_upload_reports_error() {
        let (session, sink) = seeded_session();

        let result = session.submit(FileHandle::new("photo.png", "image/png", 2048));
        assert!(matches!(result, Err(ReviewError::UnsupportedFormat { .. })));
        assert_eq!(session.statements().len(), 2);

        let notes = sink.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Error);
        assert!(notes[0].message.contains("photo.png"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ingestion_bumps_total_statements() {
        let sink = Arc::new(CollectingSink::new());
        let config = PipelineConfig::new(Duration::from_millis(500), 5, 24);
        let session = ReviewSession::seeded(sink.clone(), &config, Handle::current()).unwrap();
        let before = session.dashboard();

        session
            .submit(FileHandle::new("march.pdf", PDF_MIME_TYPE, 512 * 1024))
            .unwrap();
        assert_eq!(session.dashboard().total_statements, before.total_statements);

        session.drain().await;

        let after = session.dashboard();
        assert_eq!(after.total_statements, before.total_statements + 1);
        assert_eq!(session.statements()[0].status, StatementStatus::Completed);
        assert_eq!(sink.count_of(NotificationKind::Success), 1);
    }

    #[tokio::test]
    async fn test_review_and_stats_follow_transitions() {
        let (session, _sink) = seeded_session();
        session.transition("7", ReviewStatus::Disputed).unwrap();

        let flagged = session.review(&ReviewQuery::new("", FlagFilter::Flagged, SortOrder::Desc));
        let ids: Vec<_> = flagged.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "5", "3"]);
        assert_eq!(flagged[0].status, ReviewStatus::Disputed);

        let stats = session.stats();
        assert_eq!(stats.disputed_count, 2);
        assert_eq!(stats.pending_count, 2);
    }
}
