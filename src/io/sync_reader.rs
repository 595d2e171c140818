//! Synchronous transaction CSV reader with iterator interface
//!
//! Provides a streaming iterator over transactions from a CSV export.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! TransactionReader implements the Iterator trait, yielding
//! `Result<Transaction, ReviewError>` for each CSV row:
//!
//! ```no_run
//! use statement_review::io::sync_reader::TransactionReader;
//! use std::path::Path;
//!
//! let reader = TransactionReader::new(Path::new("transactions.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(tx) => println!("Loaded transaction {}", tx.id),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as `ReviewError::ParseError` carrying
//!   the line number, and iteration continues with the next row

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{ReviewError, Transaction};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous transaction CSV reader
#[derive(Debug)]
pub struct TransactionReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    record: StringRecord,
    line_num: u64,
}

impl TransactionReader {
    /// Create a new TransactionReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be absent
    ///   and are read as empty)
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::IoError` if the file cannot be opened, or
    /// `ReviewError::ParseError` if the header row cannot be read.
    pub fn new(path: &Path) -> Result<Self, ReviewError> {
        let file = File::open(path).map_err(|e| ReviewError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
            line_num: 1,
        })
    }

    fn parse_error(&self, message: impl ToString) -> ReviewError {
        ReviewError::ParseError {
            line: Some(self.line_num),
            message: message.to_string(),
        }
    }
}

impl Iterator for TransactionReader {
    type Item = Result<Transaction, ReviewError>;

    fn next(&mut self) -> Option<Self::Item> {
        let read = self.reader.read_record(&mut self.record);
        self.line_num += 1;

        match read {
            Ok(false) => return None,
            Ok(true) => {}
            Err(e) => return Some(Err(self.parse_error(e))),
        }

        // Short rows get empty trailing fields so optional columns default
        while self.record.len() < self.headers.len() {
            self.record.push_field("");
        }

        let parsed = self
            .record
            .deserialize::<CsvRecord>(Some(&self.headers))
            .map_err(|e| self.parse_error(e))
            .and_then(|csv_record| convert_csv_record(csv_record).map_err(|e| self.parse_error(e)));
        Some(parsed)
    }
}
