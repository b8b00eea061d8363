// ==========================================
// Depot Management - configuration
// ==========================================
// Source: process environment (DEPOT_*)
// Read once at startup and handed to the composition root
// ==========================================

use crate::app::registration::RepositoryMode;
use crate::schema::ProvisionTarget;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const ENV_DB_PATH: &str = "DEPOT_DB_PATH";
pub const ENV_REPOSITORY_MODE: &str = "DEPOT_REPOSITORY_MODE";
pub const ENV_BIND_ADDR: &str = "DEPOT_BIND_ADDR";
pub const ENV_PROVISION: &str = "DEPOT_PROVISION";
pub const ENV_OPERATION_TIMEOUT_MS: &str = "DEPOT_OPERATION_TIMEOUT_MS";
pub const ENV_LOG_FORMAT: &str = "DEPOT_LOG_FORMAT";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5080";
pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 30_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DepotAppConfig {
    pub db_path: String,
    pub repository_mode: RepositoryMode,
    pub bind_addr: SocketAddr,
    /// `None` skips schema provisioning at startup
    pub provision: Option<ProvisionTarget>,
    pub operation_timeout: Duration,
    pub log_format: LogFormat,
}

impl DepotAppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_path = get(ENV_DB_PATH).unwrap_or_else(default_db_path);

        let repository_mode = match get(ENV_REPOSITORY_MODE) {
            Some(raw) => raw
                .parse::<RepositoryMode>()
                .map_err(|e| ConfigError::invalid(ENV_REPOSITORY_MODE, &raw, e))?,
            None => RepositoryMode::default(),
        };

        let bind_raw = get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(ENV_BIND_ADDR, &bind_raw, e))?;

        let provision = match get(ENV_PROVISION) {
            None => Some(ProvisionTarget::Master),
            Some(raw) if raw.eq_ignore_ascii_case("none") => None,
            Some(raw) => Some(
                raw.parse::<ProvisionTarget>()
                    .map_err(|e| ConfigError::invalid(ENV_PROVISION, &raw, e))?,
            ),
        };

        let operation_timeout = match get(ENV_OPERATION_TIMEOUT_MS) {
            Some(raw) => {
                let ms = raw
                    .parse::<u64>()
                    .map_err(|e| ConfigError::invalid(ENV_OPERATION_TIMEOUT_MS, &raw, e))?;
                if ms == 0 {
                    return Err(ConfigError::invalid(
                        ENV_OPERATION_TIMEOUT_MS,
                        &raw,
                        "must be greater than zero",
                    ));
                }
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS),
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            None => LogFormat::Text,
            Some(raw) if raw.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) => {
                return Err(ConfigError::invalid(ENV_LOG_FORMAT, &raw, "expected text or json"))
            }
        };

        Ok(Self {
            db_path,
            repository_mode,
            bind_addr,
            provision,
            operation_timeout,
            log_format,
        })
    }
}

/// Default database path
///
/// Per-user data directory (`<data_dir>/depot-management/depots.db`), or
/// `./depots.db` when no data directory is available.
pub fn default_db_path() -> String {
    let mut path = PathBuf::from("./depots.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("depot-management");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("depots.db");
        }
    }

    path.to_string_lossy().to_string()
}
