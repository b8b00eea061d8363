// ==========================================
// Depot Management - provisioning errors
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisioningError {
    #[error("cannot open database {connection_string}: {message}")]
    Connection {
        connection_string: String,
        message: String,
    },

    #[error("schema convergence failed for {connection_string}: {source}")]
    Convergence {
        connection_string: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("tenant registry unavailable: {0}")]
    Registry(String),

    #[error("{failed} of {attempted} tenant databases failed to converge")]
    TenantFailures { attempted: usize, failed: usize },
}

pub type ProvisioningResult<T> = Result<T, ProvisioningError>;
