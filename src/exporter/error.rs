// ==========================================
// Printer inventory - export error type
// ==========================================

use thiserror::Error;

/// Export failures; converted into a failed `ExportOutcome` at the boundary
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Database file not found: {0}")]
    DatabaseNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Unexpected error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Unexpected error: path is not valid UTF-8: {0}")]
    InvalidPath(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
