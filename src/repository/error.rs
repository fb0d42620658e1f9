// ==========================================
// Printer inventory - repository error type
// ==========================================
// Tool: thiserror derive
// ==========================================

use thiserror::Error;

/// Repository error type
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Database errors =====
    #[error("Record not found: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("Database query failed: {0}")]
    DatabaseQueryError(String),

    #[error("Unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    // ===== Input errors =====
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl RepositoryError {
    /// Append a hint for the user to constraint violations; other errors pass through
    pub fn with_guidance(self, guidance: &str) -> Self {
        match self {
            RepositoryError::ForeignKeyViolation(msg) => {
                RepositoryError::ForeignKeyViolation(format!("{}. {}", msg, guidance))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                RepositoryError::UniqueConstraintViolation(format!("{}. {}", msg, guidance))
            }
            other => other,
        }
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") || msg.contains("PRIMARY KEY") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guidance_only_touches_constraint_errors() {
        let fk = RepositoryError::ForeignKeyViolation("FOREIGN KEY constraint failed".into())
            .with_guidance("Delete the referencing rows first");
        assert_eq!(
            fk.to_string(),
            "Foreign key constraint violated: FOREIGN KEY constraint failed. Delete the referencing rows first"
        );

        let other = RepositoryError::ValidationError("empty".into()).with_guidance("ignored");
        assert_eq!(other.to_string(), "Validation failed: empty");
    }
}
