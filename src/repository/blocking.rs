// ==========================================
// Depot Management - blocking execution
// ==========================================
// rusqlite is synchronous: driver work runs on tokio's blocking pool,
// bounded by the configured operation timeout.
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use std::time::{Duration, Instant};

/// Default deadline for a single repository operation
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-driver execution options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryOptions {
    pub operation_timeout: Duration,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

impl RepositoryOptions {
    pub fn with_timeout(operation_timeout: Duration) -> Self {
        Self { operation_timeout }
    }
}

/// Run `work` on the blocking pool and wait at most `timeout` for it
///
/// On expiry the caller gets `RepositoryError::Timeout`; the statement
/// already handed to SQLite still runs to completion on its thread.
pub async fn run_blocking<T, F>(
    operation: &'static str,
    timeout: Duration,
    work: F,
) -> RepositoryResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> RepositoryResult<T> + Send + 'static,
{
    let started = Instant::now();
    let handle = tokio::task::spawn_blocking(work);

    match tokio::time::timeout(timeout, handle).await {
        Ok(joined) => joined?,
        Err(_) => {
            let elapsed = started.elapsed();
            tracing::warn!(operation, ?elapsed, "repository operation timed out");
            Err(RepositoryError::Timeout { operation, elapsed })
        }
    }
}
