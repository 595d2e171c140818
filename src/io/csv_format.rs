//! CSV format handling for transaction import and export
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Transaction output serialization
//!
//! Columns: `id,date,merchant,amount,description,flagged,status,ai_reason,confidence_score`.
//! The last three may be left empty.
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{ReviewError, ReviewStatus, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Date format used in transaction CSV files
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header written by `write_transactions_csv`
pub const CSV_HEADER: [&str; 9] = [
    "id",
    "date",
    "merchant",
    "amount",
    "description",
    "flagged",
    "status",
    "ai_reason",
    "confidence_score",
];

/// CSV record structure for deserialization
///
/// Every field is read as text and validated by `convert_csv_record`, so a
/// bad value produces an error naming the field and transaction.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    pub id: String,
    pub date: String,
    pub merchant: String,
    pub amount: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flagged: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ai_reason: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Convert a CsvRecord to a Transaction
///
/// This function:
/// - Requires a non-empty ID
/// - Parses the date (`YYYY-MM-DD`) and amount
/// - Reads `flagged` as `true`/`false` (empty means `false`)
/// - Defaults an empty status to `pending`
/// - Requires a confidence score, when present, to lie in [0, 1]
///
/// # Errors
///
/// Returns `ReviewError::InvalidField` naming the first bad field.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<Transaction, ReviewError> {
    let id = csv_record.id.trim().to_string();
    if id.is_empty() {
        return Err(ReviewError::invalid_field("", "id", &csv_record.id));
    }

    let date = NaiveDate::parse_from_str(csv_record.date.trim(), DATE_FORMAT)
        .map_err(|_| ReviewError::invalid_field(&id, "date", &csv_record.date))?;

    let amount = Decimal::from_str(csv_record.amount.trim())
        .map_err(|_| ReviewError::invalid_field(&id, "amount", &csv_record.amount))?;

    let flagged = match csv_record.flagged.trim().to_lowercase().as_str() {
        "" | "false" => false,
        "true" => true,
        _ => return Err(ReviewError::invalid_field(&id, "flagged", &csv_record.flagged)),
    };

    let status = match non_empty(csv_record.status) {
        Some(raw) => ReviewStatus::from_str(&raw)
            .map_err(|_| ReviewError::invalid_field(&id, "status", &raw))?,
        None => ReviewStatus::Pending,
    };

    let confidence_score = match non_empty(csv_record.confidence_score) {
        Some(raw) => {
            let score = f64::from_str(&raw)
                .ok()
                .filter(|s| (0.0..=1.0).contains(s))
                .ok_or_else(|| ReviewError::invalid_field(&id, "confidence_score", &raw))?;
            Some(score)
        }
        None => None,
    };

    Ok(Transaction {
        id,
        date,
        merchant: csv_record.merchant.trim().to_string(),
        amount,
        description: csv_record.description.trim().to_string(),
        flagged,
        status,
        ai_reason: non_empty(csv_record.ai_reason),
        confidence_score,
    })
}

/// Write transactions to CSV format
///
/// Transactions are written in the order given, so a review view keeps its
/// sort order. Amounts are written with two decimal places.
///
/// # Errors
///
/// Returns `ReviewError::IoError` or `ReviewError::ParseError` if writing fails.
pub fn write_transactions_csv<'a, I>(transactions: I, output: &mut dyn Write) -> Result<(), ReviewError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    use csv::Writer;

    let mut writer = Writer::from_writer(output);
    writer.write_record(CSV_HEADER)?;

    for tx in transactions {
        writer.write_record(&[
            tx.id.clone(),
            tx.date.format(DATE_FORMAT).to_string(),
            tx.merchant.clone(),
            format!("{:.2}", tx.amount),
            tx.description.clone(),
            tx.flagged.to_string(),
            tx.status.to_string(),
            tx.ai_reason.clone().unwrap_or_default(),
            tx.confidence_score
                .map(|s| s.to_string())
                .unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
