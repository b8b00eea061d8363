// ==========================================
// Depot Management - repository errors
// ==========================================
// Tool: thiserror derive
// Not-found is not an error here: reads return Option, mutations
// return MutationOutcome.
// ==========================================

use std::time::Duration;
use thiserror::Error;

/// Repository error type
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== database errors =====
    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database query failed: {0}")]
    DatabaseQueryError(String),

    #[error("unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    #[error("store returned no identifier for inserted {entity}")]
    MissingIdentifier { entity: String },

    #[error("row mapping failed (column={column}): {message}")]
    RowMapping { column: String, message: String },

    // ===== execution errors =====
    #[error("operation {operation} timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },

    #[error("blocking task failed: {0}")]
    TaskJoin(String),
}

impl RepositoryError {
    pub fn row_mapping(column: impl Into<String>, message: impl ToString) -> Self {
        RepositoryError::RowMapping {
            column: column.into(),
            message: message.to_string(),
        }
    }

    /// Whether the failure came from the deadline rather than the store
    pub fn is_timeout(&self) -> bool {
        matches!(self, RepositoryError::Timeout { .. })
    }
}

// From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                let msg = msg.unwrap_or_else(|| code.to_string());
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if code.code == rusqlite::ErrorCode::CannotOpen {
                    RepositoryError::DatabaseConnectionError(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::FromSqlConversionFailure(idx, _, cause) => {
                RepositoryError::row_mapping(format!("#{}", idx), cause)
            }
            rusqlite::Error::InvalidColumnType(idx, name, ty) => RepositoryError::row_mapping(
                name,
                format!("unexpected {} value at index {}", ty, idx),
            ),
            rusqlite::Error::InvalidColumnName(name) => {
                RepositoryError::row_mapping(name, "no such column in result set")
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for RepositoryError {
    fn from(err: tokio::task::JoinError) -> Self {
        RepositoryError::TaskJoin(err.to_string())
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;
