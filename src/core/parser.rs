//! Statement parser implementations
//!
//! - `PlaceholderParser` reports a random transaction count and produces no
//!   records. It stands in until a real PDF extractor is plugged in.
//! - `PreparsedStatements` hands out transactions that an upstream extractor
//!   already produced, keyed by file name.

use crate::core::traits::{ParsedStatement, StatementParser};
use crate::types::{FileHandle, ReviewError, Transaction};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;

/// Parser that synthesizes a transaction count in a fixed range
#[derive(Debug, Clone)]
pub struct PlaceholderParser {
    min_count: u32,
    max_count: u32,
}

impl PlaceholderParser {
    /// Create a placeholder reporting counts in `min_count..=max_count`
    ///
    /// Bounds given in the wrong order are swapped; a zero lower bound is
    /// raised to 1 so completed statements always report at least one
    /// transaction.
    pub fn new(min_count: u32, max_count: u32) -> Self {
        let (low, high) = if min_count <= max_count {
            (min_count, max_count)
        } else {
            (max_count, min_count)
        };
        let low = low.max(1);
        PlaceholderParser {
            min_count: low,
            max_count: high.max(low),
        }
    }

    pub fn range(&self) -> (u32, u32) {
        (self.min_count, self.max_count)
    }
}

impl StatementParser for PlaceholderParser {
    fn parse(&self, _file: &FileHandle) -> Result<ParsedStatement, ReviewError> {
        let transaction_count = rand::thread_rng().gen_range(self.min_count..=self.max_count);
        Ok(ParsedStatement {
            transactions: Vec::new(),
            transaction_count,
        })
    }
}

/// Parser backed by transactions extracted ahead of time
///
/// Each registered file is handed out once; parsing an unknown or already
/// consumed file fails.
#[derive(Debug, Default)]
pub struct PreparsedStatements {
    by_filename: Mutex<HashMap<String, Vec<Transaction>>>,
}

impl PreparsedStatements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the transactions extracted from `filename`
    pub fn insert(&self, filename: impl Into<String>, transactions: Vec<Transaction>) {
        self.by_filename
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(filename.into(), transactions);
    }
}

impl StatementParser for PreparsedStatements {
    fn parse(&self, file: &FileHandle) -> Result<ParsedStatement, ReviewError> {
        let transactions = self
            .by_filename
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&file.name)
            .ok_or_else(|| ReviewError::parse_failed(&file.name, "no extracted transactions"))?;

        Ok(ParsedStatement::from_transactions(transactions))
    }
}
