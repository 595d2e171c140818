//! Review views over a transaction snapshot
//!
//! Pure functions: nothing here touches the store. Callers take a snapshot
//! with `TransactionStore::all()` and derive as many views as they need.

use crate::types::{ReviewStats, ReviewStatus, Transaction};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which transactions to keep based on the upstream flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FlagFilter {
    /// Keep everything
    #[default]
    All,
    /// Only flagged transactions
    Flagged,
    /// Only unflagged transactions
    Safe,
}

impl FlagFilter {
    fn matches(self, tx: &Transaction) -> bool {
        match self {
            FlagFilter::All => true,
            FlagFilter::Flagged => tx.flagged,
            FlagFilter::Safe => !tx.flagged,
        }
    }
}

/// Direction of the date sort
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
}

/// Search, filter and sort settings for a review view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewQuery {
    /// Case-insensitive substring matched against merchant or description
    pub search_term: String,
    pub status_filter: FlagFilter,
    pub sort_order: SortOrder,
}

impl ReviewQuery {
    pub fn new(
        search_term: impl Into<String>,
        status_filter: FlagFilter,
        sort_order: SortOrder,
    ) -> Self {
        ReviewQuery {
            search_term: search_term.into(),
            status_filter,
            sort_order,
        }
    }
}

/// Compute the review view of `transactions` for `query`
///
/// A transaction is kept when it matches both the search term and the flag
/// filter. The result is sorted by date; transactions on the same date keep
/// their input order in both directions. The returned references point into
/// `transactions`, which is left untouched.
pub fn review<'a>(transactions: &'a [Transaction], query: &ReviewQuery) -> Vec<&'a Transaction> {
    let needle = query.search_term.to_lowercase();

    let mut view: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| matches_search(tx, &needle) && query.status_filter.matches(tx))
        .collect();

    // `sort_by` is stable, so equal dates keep their relative order
    match query.sort_order {
        SortOrder::Asc => view.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOrder::Desc => view.sort_by(|a, b| b.date.cmp(&a.date)),
    }

    view
}

fn matches_search(tx: &Transaction, needle: &str) -> bool {
    needle.is_empty()
        || tx.merchant.to_lowercase().contains(needle)
        || tx.description.to_lowercase().contains(needle)
}

/// Count transactions by flag and review status
pub fn aggregate(transactions: &[Transaction]) -> ReviewStats {
    transactions
        .iter()
        .fold(ReviewStats::default(), |mut stats, tx| {
            stats.total += 1;
            if tx.flagged {
                stats.flagged_count += 1;
            }
            match tx.status {
                ReviewStatus::Pending => stats.pending_count += 1,
                ReviewStatus::Approved => stats.approved_count += 1,
                ReviewStatus::Disputed => stats.disputed_count += 1,
            }
            stats
        })
}
