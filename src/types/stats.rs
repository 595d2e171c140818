//! Aggregate statistics types
//!
//! `ReviewStats` and most of `DashboardStats` are recomputed from the current
//! store and pipeline state on every call. `disputes_resolved` is the
//! exception: it reads the store's running dispute tally, which only grows.

use serde::Serialize;

/// Counts over a transaction collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewStats {
    /// Number of transactions in the collection
    pub total: usize,

    /// Transactions marked by upstream analysis
    pub flagged_count: usize,

    pub pending_count: usize,
    pub approved_count: usize,
    pub disputed_count: usize,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Statements that finished ingestion successfully
    pub total_statements: usize,

    /// Flagged transactions currently in the store
    pub flagged_transactions: usize,

    /// Dispute transitions recorded by the store
    ///
    /// Counts every move to `Disputed`, and is never decremented when a
    /// disputed transaction is later approved.
    pub disputes_resolved: u64,
}
