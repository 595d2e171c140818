//! Statement-related types for the statement review engine
//!
//! An uploaded statement moves through a single ingestion lifecycle:
//! `Processing` on submission, then exactly one of `Completed` or `Failed`.

use super::error::ReviewError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Statement identifier
pub type StatementId = String;

/// Media type accepted by the ingestion pipeline
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Upload size above which a warning is logged (advisory only, never enforced)
pub const ADVISORY_SIZE_LIMIT_BYTES: u64 = 10 * 1024 * 1024;

/// Ingestion lifecycle stage of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementStatus {
    /// Submitted, completion not yet run
    Processing,

    /// Parsed and materialized into the transaction store
    Completed,

    /// The parser or the store rejected the statement
    Failed,
}

impl fmt::Display for StatementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatementStatus::Processing => "processing",
            StatementStatus::Completed => "completed",
            StatementStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Handle describing a file offered for ingestion
///
/// The engine never reads file contents itself; that is the parser's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        FileHandle {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Build a handle for a file on disk
    ///
    /// The media type is inferred from the extension, which is all the
    /// boundary layer has to go on before a parser looks at the bytes.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::IoError` if the file metadata cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ReviewError> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mime_type = match path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("pdf") => PDF_MIME_TYPE,
            Some("csv") => "text/csv",
            Some("txt") => "text/plain",
            _ => "application/octet-stream",
        };

        Ok(FileHandle::new(name, mime_type, metadata.len()))
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case(PDF_MIME_TYPE)
    }
}

/// A statement file tracked by the ingestion pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedStatement {
    pub id: StatementId,

    /// Original file name as submitted
    pub filename: String,

    pub status: StatementStatus,

    pub uploaded_at: DateTime<Utc>,

    /// Number of transactions found in the statement
    ///
    /// `None` until the statement completes; set exactly once.
    pub transaction_count: Option<u32>,

    /// Reason the statement failed, present only when `Failed`
    pub error: Option<String>,
}

impl UploadedStatement {
    /// Create a freshly submitted statement
    pub fn processing(
        id: impl Into<StatementId>,
        filename: impl Into<String>,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        UploadedStatement {
            id: id.into(),
            filename: filename.into(),
            status: StatementStatus::Processing,
            uploaded_at,
            transaction_count: None,
            error: None,
        }
    }

    /// Move a processing statement to `Completed` with its transaction count
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::StatementNotProcessing` if the statement already
    /// left the `Processing` stage; the record is left untouched.
    pub fn complete(&mut self, transaction_count: u32) -> Result<(), ReviewError> {
        self.ensure_processing()?;
        self.status = StatementStatus::Completed;
        self.transaction_count = Some(transaction_count);
        Ok(())
    }

    /// Move a processing statement to `Failed`
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::StatementNotProcessing` if the statement already
    /// left the `Processing` stage.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), ReviewError> {
        self.ensure_processing()?;
        self.status = StatementStatus::Failed;
        self.error = Some(reason.into());
        Ok(())
    }

    fn ensure_processing(&self) -> Result<(), ReviewError> {
        if self.status != StatementStatus::Processing {
            return Err(ReviewError::statement_not_processing(&self.id, self.status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::Builder;

    #[rstest]
    #[case::pdf("application/pdf", true)]
    #[case::pdf_uppercase("Application/PDF", true)]
    #[case::csv("text/csv", false)]
    #[case::empty("", false)]
    fn test_is_pdf(#[case] mime: &str, #[case] expected: bool) {
        assert_eq!(FileHandle::new("f", mime, 0).is_pdf(), expected);
    }

    #[rstest]
    #[case::pdf(".pdf", PDF_MIME_TYPE)]
    #[case::pdf_uppercase(".PDF", PDF_MIME_TYPE)]
    #[case::csv(".csv", "text/csv")]
    #[case::unknown(".bin", "application/octet-stream")]
    fn test_from_path_infers_mime_type(#[case] suffix: &str, #[case] expected: &str) {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(b"%PDF-1.7").unwrap();
        file.flush().unwrap();

        let handle = FileHandle::from_path(file.path()).unwrap();
        assert_eq!(handle.mime_type, expected);
        assert_eq!(handle.size_bytes, 8);
        assert!(handle.name.ends_with(suffix));
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = FileHandle::from_path(Path::new("/definitely/not/here.pdf"));
        assert!(matches!(result, Err(ReviewError::IoError { .. })));
    }

    #[test]
    fn test_complete_sets_count_once() {
        let mut statement = UploadedStatement::processing("s1", "march.pdf", Utc::now());
        assert!(statement.transaction_count.is_none());

        statement.complete(12).unwrap();
        assert_eq!(statement.status, StatementStatus::Completed);
        assert_eq!(statement.transaction_count, Some(12));

        let second = statement.complete(99);
        assert!(matches!(
            second,
            Err(ReviewError::StatementNotProcessing { .. })
        ));
        assert_eq!(statement.transaction_count, Some(12));
    }

    #[test]
    fn test_fail_records_reason_without_count() {
        let mut statement = UploadedStatement::processing("s1", "march.pdf", Utc::now());
        statement.fail("unreadable page 2").unwrap();

        assert_eq!(statement.status, StatementStatus::Failed);
        assert_eq!(statement.error.as_deref(), Some("unreadable page 2"));
        assert!(statement.transaction_count.is_none());
        assert!(statement.complete(3).is_err());
    }
}
