//! Demo dataset
//!
//! Eight transactions from January and February 2025 (three of them flagged)
//! and two completed statements. The CLI starts from this state when no
//! transactions file is given.

use crate::types::{ReviewStatus, StatementStatus, Transaction, UploadedStatement};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap_or_default()
}

fn at(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, 14, 30, 0)
        .single()
        .unwrap_or_default()
}

/// The demo transactions, in ID order
pub fn seed_transactions() -> Vec<Transaction> {
    vec![
        Transaction::new("1", day(1, 5), "Amazon", Decimal::new(12999, 2), "Online purchase"),
        Transaction::new("2", day(1, 12), "Starbucks", Decimal::new(845, 2), "Coffee shop")
            .with_status(ReviewStatus::Approved),
        Transaction::new(
            "3",
            day(1, 15),
            "Unknown Vendor",
            Decimal::new(49999, 2),
            "Online purchase",
        )
        .flagged(
            "Unusual merchant and high amount compared to your spending patterns",
            0.89,
        ),
        Transaction::new("4", day(1, 18), "Target", Decimal::new(8632, 2), "Retail purchase")
            .with_status(ReviewStatus::Approved),
        Transaction::new(
            "5",
            day(1, 23),
            "DigitalServices Ltd.",
            Decimal::new(24900, 2),
            "Subscription renewal",
        )
        .flagged("No previous transaction history with this merchant", 0.75)
        .with_status(ReviewStatus::Disputed),
        Transaction::new("6", day(1, 25), "Walmart", Decimal::new(15327, 2), "Grocery shopping")
            .with_status(ReviewStatus::Approved),
        Transaction::new(
            "7",
            day(2, 1),
            "Foreign Merchant",
            Decimal::new(32550, 2),
            "International transaction",
        )
        .flagged("Unusual location and transaction pattern", 0.92),
        Transaction::new("8", day(2, 3), "Gas Station", Decimal::new(4525, 2), "Fuel purchase")
            .with_status(ReviewStatus::Approved),
    ]
}

/// The demo statements, most recent first
pub fn seed_statements() -> Vec<UploadedStatement> {
    [
        ("1", "March_2025_Statement.pdf", at(4, 1)),
        ("2", "February_2025_Statement.pdf", at(3, 1)),
    ]
    .into_iter()
    .map(|(id, filename, uploaded_at)| UploadedStatement {
        id: id.to_string(),
        filename: filename.to_string(),
        status: StatementStatus::Completed,
        uploaded_at,
        transaction_count: Some(23),
        error: None,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_transactions_shape() {
        let txs = seed_transactions();
        assert_eq!(txs.len(), 8);

        let ids: HashSet<_> = txs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 8);

        let flagged: Vec<_> = txs.iter().filter(|t| t.flagged).map(|t| t.id.as_str()).collect();
        assert_eq!(flagged, vec!["3", "5", "7"]);

        let three = &txs[2];
        assert_eq!(three.merchant, "Unknown Vendor");
        assert_eq!(three.amount, Decimal::new(49999, 2));
        assert_eq!(three.status, ReviewStatus::Pending);
    }

    #[test]
    fn test_seed_statements_are_completed_and_newest_first() {
        let statements = seed_statements();
        assert_eq!(statements.len(), 2);
        assert!(statements
            .iter()
            .all(|s| s.status == StatementStatus::Completed && s.transaction_count == Some(23)));
        assert!(statements[0].uploaded_at > statements[1].uploaded_at);
    }
}
