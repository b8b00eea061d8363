// ==========================================
// Depot Management - connection factory
// ==========================================
// Every repository operation opens its own connection and drops it when
// the operation ends. Nothing is pooled or held between calls.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::Arc;

/// Opens configured SQLite connections for one database
#[derive(Debug, Clone)]
pub struct SqliteConnectionFactory {
    connection_string: Arc<str>,
}

impl SqliteConnectionFactory {
    /// # Parameters
    /// - `connection_string`: SQLite database path
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: Arc::from(connection_string.into()),
        }
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Open a fresh connection with the shared PRAGMA setup
    pub fn open(&self) -> RepositoryResult<Connection> {
        open_sqlite_connection(&self.connection_string).map_err(|e| {
            tracing::error!(
                db = %self.connection_string,
                error = %e,
                "failed to open database connection"
            );
            RepositoryError::DatabaseConnectionError(format!(
                "{}: {}",
                self.connection_string, e
            ))
        })
    }
}
