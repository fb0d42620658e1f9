// ==========================================
// Printer inventory - import error type
// ==========================================
// Tool: thiserror derive
// ==========================================

use thiserror::Error;

/// Import error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0} (only .xlsx/.xlsm/.xls/.ods are read)")]
    UnsupportedFormat(String),

    #[error("File read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("Workbook has no sheet #{index} (expected the '{expected}' sheet)")]
    MissingSheet { index: usize, expected: String },

    // ===== Mapping errors =====
    #[error("Sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Type conversion failed (row {row}, column {field}): {message}")]
    TypeConversion {
        row: usize,
        field: String,
        message: String,
    },

    // ===== Business rule errors =====
    #[error("Import aborted: printer assigned to multiple locations: {}", printers.join(", "))]
    MultiLocationPrinter { printers: Vec<String> },

    #[error("Unknown {kind} '{name}' referenced by bureau {bureau_id}")]
    MissingLookup {
        kind: LookupKind,
        name: String,
        bureau_id: i64,
    },

    // ===== Database errors =====
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Lookup table a missing-lookup error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Location,
    Department,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKind::Location => write!(f, "location"),
            LookupKind::Department => write!(f, "department"),
        }
    }
}

impl ImportError {
    /// Whether this is a business rule failure rather than a storage/input one
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ImportError::MultiLocationPrinter { .. })
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                ImportError::ConstraintViolation(msg.unwrap_or_else(|| code.to_string()))
            }
            _ => ImportError::DatabaseError(err.to_string()),
        }
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_maps_to_constraint_error() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT PRIMARY KEY); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: ImportError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        match err {
            ImportError::ConstraintViolation(msg) => assert!(msg.contains("UNIQUE")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_multi_location_message_names_printers() {
        let err = ImportError::MultiLocationPrinter {
            printers: vec!["P1".to_string(), "P7".to_string()],
        };
        assert!(err.is_validation_error());
        assert_eq!(
            err.to_string(),
            "Import aborted: printer assigned to multiple locations: P1, P7"
        );
    }
}
