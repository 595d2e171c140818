//! Transaction-related types for the statement review engine
//!
//! This module defines the reviewed transaction record and its review workflow
//! status. Everything except `status` is fixed when the record is created.

use crate::types::ReviewError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction identifier
///
/// Opaque, caller-supplied and stable for the life of the record.
pub type TransactionId = String;

/// Review workflow status of a transaction
///
/// `Pending` is the only status a freshly ingested transaction carries. No
/// status blocks any other: every transition is accepted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Awaiting a human decision
    Pending,

    /// Accepted as legitimate by the reviewer
    Approved,

    /// Challenged by the reviewer
    Disputed,
}

impl ReviewStatus {
    /// Actions a reviewer is offered for a transaction in this status
    ///
    /// Pending transactions can go either way; decided transactions only offer
    /// the opposite decision.
    pub fn available_actions(self) -> &'static [ReviewStatus] {
        match self {
            ReviewStatus::Pending => &[ReviewStatus::Approved, ReviewStatus::Disputed],
            ReviewStatus::Approved => &[ReviewStatus::Disputed],
            ReviewStatus::Disputed => &[ReviewStatus::Approved],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Disputed => "disputed",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "disputed" => Ok(ReviewStatus::Disputed),
            other => Err(format!("unknown review status '{}'", other)),
        }
    }
}

/// A single credit-card transaction under review
///
/// `flagged`, `ai_reason` and `confidence_score` come from upstream analysis
/// and are carried through untouched. Only the store may change `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier within a store
    pub id: TransactionId,

    /// Posting date of the transaction
    pub date: NaiveDate,

    /// Merchant name as printed on the statement
    pub merchant: String,

    /// Charged amount
    pub amount: Decimal,

    pub description: String,

    /// Marked as anomalous by upstream analysis
    ///
    /// Provenance, not workflow state: independent of `status`.
    pub flagged: bool,

    /// Current review outcome
    pub status: ReviewStatus,

    /// Human-readable explanation of why the transaction was flagged
    pub ai_reason: Option<String>,

    /// Upstream model confidence in [0, 1]
    pub confidence_score: Option<f64>,
}

impl Transaction {
    /// Create a pending, unflagged transaction
    pub fn new(
        id: impl Into<TransactionId>,
        date: NaiveDate,
        merchant: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Transaction {
            id: id.into(),
            date,
            merchant: merchant.into(),
            amount,
            description: description.into(),
            flagged: false,
            status: ReviewStatus::Pending,
            ai_reason: None,
            confidence_score: None,
        }
    }

    /// Mark the transaction as flagged with the upstream reasoning attached
    pub fn flagged(mut self, reason: impl Into<String>, confidence_score: f64) -> Self {
        self.flagged = true;
        self.ai_reason = Some(reason.into());
        self.confidence_score = Some(confidence_score);
        self
    }

    /// Override the initial review status
    pub fn with_status(mut self, status: ReviewStatus) -> Self {
        self.status = status;
        self
    }

    /// Check field ranges the builders cannot enforce
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::InvalidField` if the confidence score is outside
    /// [0, 1] or not a number.
    pub fn validate(&self) -> Result<(), ReviewError> {
        match self.confidence_score {
            Some(score) if !(0.0..=1.0).contains(&score) => Err(ReviewError::invalid_field(
                &self.id,
                "confidence_score",
                &score.to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::pending(ReviewStatus::Pending, &[ReviewStatus::Approved, ReviewStatus::Disputed])]
    #[case::approved(ReviewStatus::Approved, &[ReviewStatus::Disputed])]
    #[case::disputed(ReviewStatus::Disputed, &[ReviewStatus::Approved])]
    fn test_available_actions(#[case] status: ReviewStatus, #[case] expected: &[ReviewStatus]) {
        assert_eq!(status.available_actions(), expected);
    }

    #[rstest]
    #[case("pending", ReviewStatus::Pending)]
    #[case("Approved", ReviewStatus::Approved)]
    #[case(" DISPUTED ", ReviewStatus::Disputed)]
    fn test_status_parsing(#[case] input: &str, #[case] expected: ReviewStatus) {
        assert_eq!(input.parse::<ReviewStatus>().unwrap(), expected);
    }

    #[test]
    fn test_status_parsing_rejects_unknown() {
        assert!("resolved".parse::<ReviewStatus>().is_err());
    }

    #[test]
    fn test_new_transaction_is_pending_and_unflagged() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let tx = Transaction::new("1", date, "Amazon", Decimal::new(12999, 2), "Online purchase");

        assert_eq!(tx.status, ReviewStatus::Pending);
        assert!(!tx.flagged);
        assert!(tx.ai_reason.is_none());
        assert!(tx.confidence_score.is_none());
    }

    #[test]
    fn test_flagged_builder_sets_provenance() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let tx = Transaction::new("3", date, "Unknown Vendor", Decimal::new(49999, 2), "Online")
            .flagged("Unusual merchant", 0.89);

        assert!(tx.flagged);
        assert_eq!(tx.ai_reason.as_deref(), Some("Unusual merchant"));
        assert_eq!(tx.confidence_score, Some(0.89));
    }

    #[rstest]
    #[case::unflagged(None, true)]
    #[case::lower_bound(Some(0.0), true)]
    #[case::upper_bound(Some(1.0), true)]
    #[case::above_one(Some(7.5), false)]
    #[case::negative(Some(-0.1), false)]
    #[case::not_a_number(Some(f64::NAN), false)]
    fn test_validate_confidence_score(#[case] score: Option<f64>, #[case] valid: bool) {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let mut tx = Transaction::new("b", date, "Unknown Vendor", Decimal::ONE, "Online");
        tx.confidence_score = score;

        match tx.validate() {
            Ok(()) => assert!(valid),
            Err(ReviewError::InvalidField { id, field, .. }) => {
                assert!(!valid);
                assert_eq!(id, "b");
                assert_eq!(field, "confidence_score");
            }
            Err(other) => panic!("Expected InvalidField, got {:?}", other),
        }
    }
}
