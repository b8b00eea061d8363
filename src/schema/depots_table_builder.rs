// ==========================================
// Depot Management - Depots table convergence
// ==========================================
// Per database, in one IMMEDIATE transaction:
// 1. create Depots when absent
// 2. otherwise add missing manifest columns (never alter or drop)
// 3. seed two depots into an empty table
// Running it again changes nothing.
// ==========================================

use crate::db::{column_names, open_sqlite_connection, table_exists};
use crate::domain::{format_created_at, now_utc, DEPOTS_TABLE};
use crate::schema::error::{ProvisioningError, ProvisioningResult};
use crate::schema::tenant_registry::{SqliteTenantRegistry, TenantRegistry};
use rusqlite::{params, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const CREATE_DEPOTS_SQL: &str = r#"
    CREATE TABLE Depots (
        Id INTEGER PRIMARY KEY AUTOINCREMENT,
        Active INTEGER NOT NULL DEFAULT 1,
        IsDeleted INTEGER NOT NULL DEFAULT 0,
        CreatedAt TEXT NOT NULL,
        CreatedBy VARCHAR(255) NULL,
        Name TEXT NULL
    )
"#;

/// Columns every Depots table must have, with their additive definitions
///
/// SQLite refuses `ADD COLUMN ... NOT NULL` without a default, hence the
/// epoch default on CreatedAt.
pub const COLUMN_MANIFEST: &[(&str, &str)] = &[
    ("Active", "INTEGER NOT NULL DEFAULT 1"),
    ("IsDeleted", "INTEGER NOT NULL DEFAULT 0"),
    ("CreatedAt", "TEXT NOT NULL DEFAULT '1970-01-01T00:00:00+00:00'"),
    ("CreatedBy", "VARCHAR(255) NULL"),
    ("Name", "TEXT NULL"),
];

/// Names of the rows inserted into an empty table
pub const SEED_DEPOT_NAMES: [&str; 2] = ["Initial Depot 1", "Initial Depot 2"];

/// Attribution of seeded rows
pub const SEED_CREATED_BY: &str = "System";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Insert the two initial depots into an empty table
    #[default]
    DefaultDepots,
    Skip,
}

/// Which databases a provisioning run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisionTarget {
    Master,
    Tenants,
}

impl FromStr for ProvisionTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "master" => Ok(ProvisionTarget::Master),
            "tenants" | "tenant" => Ok(ProvisionTarget::Tenants),
            other => Err(format!("unknown provision target: {}", other)),
        }
    }
}

impl fmt::Display for ProvisionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionTarget::Master => write!(f, "master"),
            ProvisionTarget::Tenants => write!(f, "tenants"),
        }
    }
}

/// What one convergence pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvergenceReport {
    pub table_created: bool,
    pub columns_added: Vec<String>,
    pub seeded_rows: usize,
}

impl ConvergenceReport {
    pub fn is_noop(&self) -> bool {
        !self.table_created && self.columns_added.is_empty() && self.seeded_rows == 0
    }
}

/// Outcome of provisioning a set of databases
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvisioningSummary {
    pub converged: Vec<(String, ConvergenceReport)>,
    pub failed: Vec<(String, String)>,
}

impl ProvisioningSummary {
    pub fn attempted(&self) -> usize {
        self.converged.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Err when any database failed
    pub fn into_result(self) -> ProvisioningResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ProvisioningError::TenantFailures {
                attempted: self.attempted(),
                failed: self.failed.len(),
            })
        }
    }

    fn record(&mut self, connection_string: &str, result: ProvisioningResult<ConvergenceReport>) {
        match result {
            Ok(report) => self.converged.push((connection_string.to_string(), report)),
            Err(e) => self.failed.push((connection_string.to_string(), e.to_string())),
        }
    }
}

// ==========================================
// DepotsTableBuilder
// ==========================================
pub struct DepotsTableBuilder {
    master_connection_string: String,
    registry: Arc<dyn TenantRegistry>,
    seed_policy: SeedPolicy,
}

impl DepotsTableBuilder {
    /// Builder over the master database; tenants come from its Tenants table
    pub fn new(master_connection_string: impl Into<String>) -> Self {
        let master_connection_string = master_connection_string.into();
        let registry = Arc::new(SqliteTenantRegistry::new(master_connection_string.clone()));
        Self {
            master_connection_string,
            registry,
            seed_policy: SeedPolicy::default(),
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn TenantRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_seed_policy(mut self, seed_policy: SeedPolicy) -> Self {
        self.seed_policy = seed_policy;
        self
    }

    /// Converge the master database
    pub fn build_master_database(&self) -> ProvisioningResult<ConvergenceReport> {
        let result = self.ensure_depots_table(&self.master_connection_string);
        match &result {
            Ok(report) => tracing::info!(?report, "Depots table processed (master DB)"),
            Err(e) => tracing::error!(error = %e, "error processing master DB"),
        }
        result
    }

    /// Converge every tenant database; one failure never stops the rest
    ///
    /// Only a registry failure returns Err.
    pub fn build_tenant_databases(&self) -> ProvisioningResult<ProvisioningSummary> {
        let tenants = self.registry.list_tenant_connection_strings()?;
        tracing::info!(count = tenants.len(), "provisioning tenant databases");

        let mut summary = ProvisioningSummary::default();
        for connection_string in &tenants {
            let result = self.ensure_depots_table(connection_string);
            match &result {
                Ok(report) => tracing::info!(
                    tenant = %connection_string,
                    ?report,
                    "Depots table processed (tenant DB)"
                ),
                Err(e) => tracing::error!(
                    tenant = %connection_string,
                    error = %e,
                    "error processing tenant DB"
                ),
            }
            summary.record(connection_string, result);
        }

        Ok(summary)
    }

    /// Entry point for binaries: provision the chosen target
    pub fn run(
        master_connection_string: &str,
        target: ProvisionTarget,
    ) -> ProvisioningResult<ProvisioningSummary> {
        Self::new(master_connection_string).run_target(target)
    }

    /// Provision the chosen target with this builder's registry and policy
    pub fn run_target(&self, target: ProvisionTarget) -> ProvisioningResult<ProvisioningSummary> {
        match target {
            ProvisionTarget::Master => {
                let mut summary = ProvisioningSummary::default();
                summary.record(&self.master_connection_string, self.build_master_database());
                Ok(summary)
            }
            ProvisionTarget::Tenants => self.build_tenant_databases().map_err(|e| {
                tracing::error!(error = %e, "error while processing Depots table");
                e
            }),
        }
    }

    /// Converge one database
    pub fn ensure_depots_table(&self, connection_string: &str) -> ProvisioningResult<ConvergenceReport> {
        let convergence = |source: rusqlite::Error| ProvisioningError::Convergence {
            connection_string: connection_string.to_string(),
            source,
        };

        let mut conn =
            open_sqlite_connection(connection_string).map_err(|e| ProvisioningError::Connection {
                connection_string: connection_string.to_string(),
                message: e.to_string(),
            })?;

        // IMMEDIATE takes the write lock up front: two concurrent runs
        // cannot both see an empty table and seed it twice.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(convergence)?;

        let mut report = ConvergenceReport::default();

        if !table_exists(&tx, DEPOTS_TABLE).map_err(convergence)? {
            tx.execute_batch(CREATE_DEPOTS_SQL).map_err(convergence)?;
            report.table_created = true;
            tracing::info!(db = %connection_string, "Depots table created");
        } else {
            let existing = column_names(&tx, DEPOTS_TABLE).map_err(convergence)?;
            for (column, definition) in COLUMN_MANIFEST {
                if existing.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                    continue;
                }
                tx.execute_batch(&format!(
                    "ALTER TABLE {} ADD COLUMN {} {}",
                    DEPOTS_TABLE, column, definition
                ))
                .map_err(convergence)?;
                tracing::info!(db = %connection_string, column, definition, "column added");
                report.columns_added.push(column.to_string());
            }
        }

        if self.seed_policy == SeedPolicy::DefaultDepots {
            let rows: i64 = tx
                .query_row("SELECT COUNT(*) FROM Depots", [], |row| row.get(0))
                .map_err(convergence)?;

            if rows == 0 {
                let created_at = format_created_at(&now_utc());
                for name in SEED_DEPOT_NAMES {
                    report.seeded_rows += tx
                        .execute(
                            "INSERT INTO Depots (Active, IsDeleted, CreatedAt, CreatedBy, Name) \
                             VALUES (1, 0, ?1, ?2, ?3)",
                            params![created_at, SEED_CREATED_BY, name],
                        )
                        .map_err(convergence)?;
                }
                tracing::info!(db = %connection_string, rows = report.seeded_rows, "seed depots inserted");
            }
        }

        tx.commit().map_err(convergence)?;
        Ok(report)
    }
}
