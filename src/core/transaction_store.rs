//! Canonical transaction storage with review status transitions
//!
//! This module provides the `TransactionStore`, the single owner of every
//! transaction in a review session. Records are appended by the ingestion
//! pipeline and afterwards only their `status` changes.
//!
//! # Design
//!
//! Records live in a `DashMap` keyed by transaction ID, so transitions on
//! different transactions lock different shards and never wait on each other,
//! while transitions on the same transaction serialize (last write wins).
//! Insertion order is kept in a separate `RwLock<Vec<_>>`; `append` holds its
//! write lock for the whole batch, so `all()` sees either none or all of an
//! appended batch.
//!
//! # Dispute Tally
//!
//! Every transition to `Disputed` (and every record appended already
//! disputed) bumps a counter that is never decremented. The dashboard reports
//! it as "disputes resolved".

use crate::types::{ReviewError, ReviewStatus, Transaction, TransactionId};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, error, info};

/// Thread-safe transaction store
#[derive(Debug, Default)]
pub struct TransactionStore {
    /// Transaction records by ID
    records: DashMap<TransactionId, Transaction>,

    /// Transaction IDs in append order
    order: RwLock<Vec<TransactionId>>,

    /// Number of moves to `Disputed` seen so far
    dispute_tally: AtomicU64,
}

impl TransactionStore {
    /// Create a new empty transaction store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `transactions`
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::DuplicateId` if the seed repeats an ID.
    pub fn with_transactions(transactions: Vec<Transaction>) -> Result<Self, ReviewError> {
        let store = Self::new();
        store.append(transactions)?;
        Ok(store)
    }

    /// Append new transactions, preserving the caller's order
    ///
    /// The batch is validated as a whole before anything is inserted: if any
    /// ID already exists in the store, or appears twice in the batch, nothing
    /// is appended.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::DuplicateId` naming the first offending ID.
    pub fn append(&self, transactions: Vec<Transaction>) -> Result<(), ReviewError> {
        if transactions.is_empty() {
            return Ok(());
        }

        let mut order = self.order.write().unwrap_or_else(PoisonError::into_inner);

        {
            let mut incoming = HashSet::with_capacity(transactions.len());
            for tx in &transactions {
                if self.records.contains_key(&tx.id) || !incoming.insert(tx.id.as_str()) {
                    error!(id = %tx.id, "rejecting append: duplicate transaction id");
                    return Err(ReviewError::duplicate_id(&tx.id));
                }
            }
        }

        let appended = transactions.len();
        let disputed = transactions
            .iter()
            .filter(|tx| tx.status == ReviewStatus::Disputed)
            .count() as u64;

        order.reserve(appended);
        for tx in transactions {
            order.push(tx.id.clone());
            self.records.insert(tx.id.clone(), tx);
        }

        if disputed > 0 {
            self.dispute_tally.fetch_add(disputed, Ordering::SeqCst);
        }

        debug!(appended, total = order.len(), "appended transactions");
        Ok(())
    }

    /// Set the review status of a transaction
    ///
    /// Any status may follow any other, including itself.
    ///
    /// # Returns
    ///
    /// A copy of the updated record.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::TransactionNotFound` if no transaction has this
    /// ID; the store is left unchanged.
    pub fn transition(
        &self,
        id: &str,
        new_status: ReviewStatus,
    ) -> Result<Transaction, ReviewError> {
        let (previous, updated) = {
            let mut entry = self
                .records
                .get_mut(id)
                .ok_or_else(|| ReviewError::not_found(id, "transition"))?;
            let previous = entry.status;
            entry.status = new_status;
            (previous, entry.clone())
        };

        if new_status == ReviewStatus::Disputed {
            self.dispute_tally.fetch_add(1, Ordering::SeqCst);
        }

        info!(id, from = %previous, to = %new_status, "transaction status changed");
        Ok(updated)
    }

    /// Get a copy of a single transaction
    pub fn get(&self, id: &str) -> Option<Transaction> {
        self.records.get(id).map(|entry| entry.value().clone())
    }

    /// Snapshot of every transaction in append order
    ///
    /// The returned vector is owned by the caller; changing it has no effect
    /// on the store.
    pub fn all(&self) -> Vec<Transaction> {
        let order = self.order.read().unwrap_or_else(PoisonError::into_inner);
        order
            .iter()
            .filter_map(|id| self.records.get(id).map(|entry| entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of moves to `Disputed` recorded so far
    pub fn dispute_tally(&self) -> u64 {
        self.dispute_tally.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_transactions;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use std::thread;

    fn tx(id: &str, day: u32) -> Transaction {
        Transaction::new(
            id,
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            "Merchant",
            Decimal::new(1000, 2),
            "Purchase",
        )
    }

    fn seeded() -> TransactionStore {
        TransactionStore::with_transactions(seed_transactions()).unwrap()
    }

    #[test]
    fn test_append_then_all_preserves_order() {
        let store = TransactionStore::new();
        store.append(vec![tx("b", 2), tx("a", 1), tx("c", 3)]).unwrap();

        let ids: Vec<_> = store.all().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        store.append(vec![tx("d", 4)]).unwrap();
        let ids: Vec<_> = store.all().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_append_empty_batch_is_noop() {
        let store = TransactionStore::new();
        store.append(Vec::new()).unwrap();
        assert!(store.is_empty());
    }

    #[rstest]
    #[case::existing_id(vec![tx("x", 5), tx("1", 6)], "1")]
    #[case::repeated_within_batch(vec![tx("x", 5), tx("x", 6)], "x")]
    fn test_append_rejects_duplicates_atomically(
        #[case] batch: Vec<Transaction>,
        #[case] duplicate: &str,
    ) {
        let store = seeded();
        let before = store.all();

        let result = store.append(batch);
        assert_eq!(result, Err(ReviewError::duplicate_id(duplicate)));
        assert_eq!(store.all(), before);
        assert!(store.get("x").is_none());
    }

    #[test]
    fn test_dispute_then_approve_flagged_seed_transaction() {
        let store = seeded();

        let disputed = store.transition("3", ReviewStatus::Disputed).unwrap();
        assert_eq!(disputed.status, ReviewStatus::Disputed);
        assert!(disputed.flagged);
        assert_eq!(disputed.amount, Decimal::new(49999, 2));
        assert_eq!(disputed.merchant, "Unknown Vendor");

        let approved = store.transition("3", ReviewStatus::Approved).unwrap();
        assert_eq!(approved.status, ReviewStatus::Approved);
        assert!(approved.flagged);
    }

    #[rstest]
    #[case(ReviewStatus::Pending)]
    #[case(ReviewStatus::Approved)]
    #[case(ReviewStatus::Disputed)]
    fn test_every_transition_is_accepted(
        #[values(ReviewStatus::Pending, ReviewStatus::Approved, ReviewStatus::Disputed)]
        from: ReviewStatus,
        #[case] to: ReviewStatus,
    ) {
        let store = TransactionStore::new();
        store.append(vec![tx("t", 1).with_status(from)]).unwrap();

        let updated = store.transition("t", to).unwrap();
        assert_eq!(updated.status, to);
        assert_eq!(store.get("t").unwrap().status, to);
    }

    #[test]
    fn test_transition_only_changes_status() {
        let store = seeded();
        let original = store.all();

        let sequence = [
            ("3", ReviewStatus::Disputed),
            ("1", ReviewStatus::Approved),
            ("3", ReviewStatus::Approved),
            ("5", ReviewStatus::Pending),
            ("1", ReviewStatus::Approved),
        ];
        for (id, status) in sequence {
            store.transition(id, status).unwrap();
        }

        let after = store.all();
        assert_eq!(after.len(), original.len());
        for (before, now) in original.iter().zip(after.iter()) {
            let mut expected = before.clone();
            expected.status = now.status;
            assert_eq!(&expected, now);
        }
    }

    #[test]
    fn test_transition_unknown_id_leaves_store_unchanged() {
        let store = seeded();
        let before = store.all();

        let result = store.transition("nonexistent-id", ReviewStatus::Approved);
        assert_eq!(
            result,
            Err(ReviewError::not_found("nonexistent-id", "transition"))
        );
        assert_eq!(store.all(), before);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = seeded();
        let mut snapshot = store.all();
        snapshot[0].status = ReviewStatus::Disputed;
        snapshot.clear();

        assert_eq!(store.len(), 8);
        assert_eq!(store.get("1").unwrap().status, ReviewStatus::Pending);
    }

    #[test]
    fn test_dispute_tally_counts_disputes_and_never_decrements() {
        let store = seeded();
        // Seed carries one transaction that is already disputed
        assert_eq!(store.dispute_tally(), 1);

        store.transition("3", ReviewStatus::Disputed).unwrap();
        store.transition("3", ReviewStatus::Approved).unwrap();
        store.transition("7", ReviewStatus::Disputed).unwrap();
        store.transition("7", ReviewStatus::Disputed).unwrap();

        assert_eq!(store.dispute_tally(), 4);
    }

    #[test]
    fn test_concurrent_transitions_on_different_ids() {
        let store = Arc::new(TransactionStore::new());
        let batch: Vec<_> = (1..=20).map(|i| tx(&i.to_string(), 1)).collect();
        store.append(batch).unwrap();

        let mut handles = vec![];
        for i in 1..=20u32 {
            let store_clone = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let status = if i % 2 == 0 {
                    ReviewStatus::Approved
                } else {
                    ReviewStatus::Disputed
                };
                store_clone.transition(&i.to_string(), status).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        for i in 1..=20u32 {
            let expected = if i % 2 == 0 {
                ReviewStatus::Approved
            } else {
                ReviewStatus::Disputed
            };
            assert_eq!(store.get(&i.to_string()).unwrap().status, expected);
        }
        assert_eq!(store.dispute_tally(), 10);
    }

    #[test]
    fn test_concurrent_transitions_on_same_id_serialize() {
        let store = Arc::new(TransactionStore::new());
        store.append(vec![tx("shared", 1)]).unwrap();

        let mut handles = vec![];
        for i in 0..16u32 {
            let store_clone = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let status = if i % 2 == 0 {
                    ReviewStatus::Approved
                } else {
                    ReviewStatus::Disputed
                };
                store_clone.transition("shared", status).unwrap()
            }));
        }
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Every writer saw its own status applied; the record holds one of them
        assert!(results.iter().all(|t| t.id == "shared"));
        let final_status = store.get("shared").unwrap().status;
        assert_ne!(final_status, ReviewStatus::Pending);
        assert_eq!(store.len(), 1);
    }
}
