// ==========================================
// Depot Management - tenant registry
// ==========================================
// Lists the databases of every tenant so the Depots table can be
// provisioned in each of them.
// ==========================================

use crate::db::{open_sqlite_connection, table_exists};
use crate::schema::error::{ProvisioningError, ProvisioningResult};

/// Source of tenant connection strings
pub trait TenantRegistry: Send + Sync {
    /// Non-blank connection strings of all registered tenants
    fn list_tenant_connection_strings(&self) -> ProvisioningResult<Vec<String>>;
}

/// Reads `SELECT ConnectionString FROM Tenants` from the master database
#[derive(Debug, Clone)]
pub struct SqliteTenantRegistry {
    master_connection_string: String,
}

impl SqliteTenantRegistry {
    pub const TENANTS_TABLE: &'static str = "Tenants";

    pub fn new(master_connection_string: impl Into<String>) -> Self {
        Self {
            master_connection_string: master_connection_string.into(),
        }
    }
}

impl TenantRegistry for SqliteTenantRegistry {
    fn list_tenant_connection_strings(&self) -> ProvisioningResult<Vec<String>> {
        let conn = open_sqlite_connection(&self.master_connection_string)
            .map_err(|e| ProvisioningError::Registry(e.to_string()))?;

        if !table_exists(&conn, Self::TENANTS_TABLE)
            .map_err(|e| ProvisioningError::Registry(e.to_string()))?
        {
            return Err(ProvisioningError::Registry(format!(
                "table {} not found in {}",
                Self::TENANTS_TABLE,
                self.master_connection_string
            )));
        }

        let mut stmt = conn
            .prepare("SELECT ConnectionString FROM Tenants")
            .map_err(|e| ProvisioningError::Registry(e.to_string()))?;
        let values = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| ProvisioningError::Registry(e.to_string()))?;

        Ok(values
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

/// Fixed list of tenants, for tools and tests that bypass the master table
#[derive(Debug, Clone, Default)]
pub struct StaticTenantRegistry {
    connection_strings: Vec<String>,
}

impl StaticTenantRegistry {
    pub fn new<I, S>(connection_strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            connection_strings: connection_strings.into_iter().map(Into::into).collect(),
        }
    }
}

impl TenantRegistry for StaticTenantRegistry {
    fn list_tenant_connection_strings(&self) -> ProvisioningResult<Vec<String>> {
        Ok(self
            .connection_strings
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect())
    }
}
