//! I/O module
//!
//! Handles transaction CSV import and export.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `sync_reader` - Streaming transaction reader with iterator interface

pub mod csv_format;
pub mod sync_reader;

pub use csv_format::{convert_csv_record, write_transactions_csv, CsvRecord};
pub use sync_reader::TransactionReader;
