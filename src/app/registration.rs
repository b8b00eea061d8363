// ==========================================
// Depot Management - driver registration
// ==========================================
// Picks one repository driver at composition time
// ==========================================

use crate::repository::{
    DepotRepository, MappedDepotRepository, RawDepotRepository, RepositoryOptions,
    SqliteConnectionFactory, TemplatedDepotRepository,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which driver backs the Depot repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryMode {
    #[default]
    Mapped,
    Templated,
    Raw,
}

impl RepositoryMode {
    pub const ALL: [RepositoryMode; 3] = [
        RepositoryMode::Mapped,
        RepositoryMode::Templated,
        RepositoryMode::Raw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RepositoryMode::Mapped => "mapped",
            RepositoryMode::Templated => "templated",
            RepositoryMode::Raw => "raw",
        }
    }
}

impl FromStr for RepositoryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "unknown repository mode {:?} (expected mapped, templated or raw)",
                    wanted
                )
            })
    }
}

impl fmt::Display for RepositoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the Depot repository for `mode` over `connection_string`
///
/// # Parameters
/// - `connection_string`: SQLite database path
/// - `mode`: driver choice
/// - `options`: execution options (operation timeout)
///
/// # Returns
/// The driver as a shared trait object; construction does not touch the
/// database.
pub fn register_depot_repository(
    connection_string: &str,
    mode: RepositoryMode,
    options: RepositoryOptions,
) -> Arc<dyn DepotRepository> {
    let factory = SqliteConnectionFactory::new(connection_string);
    tracing::info!(mode = %mode, db = %connection_string, "registering depot repository");

    match mode {
        RepositoryMode::Mapped => Arc::new(MappedDepotRepository::new(factory, options)),
        RepositoryMode::Templated => Arc::new(TemplatedDepotRepository::new(factory, options)),
        RepositoryMode::Raw => Arc::new(RawDepotRepository::new(factory, options)),
    }
}
