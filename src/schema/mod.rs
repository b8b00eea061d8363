// ==========================================
// Depot Management - schema provisioning
// ==========================================
// Brings the Depots table of the master and tenant databases to the
// expected shape, idempotently.
// ==========================================

pub mod depots_table_builder;
pub mod error;
pub mod tenant_registry;

pub use depots_table_builder::{
    ConvergenceReport, DepotsTableBuilder, ProvisionTarget, ProvisioningSummary, SeedPolicy,
    COLUMN_MANIFEST, SEED_CREATED_BY, SEED_DEPOT_NAMES,
};
pub use error::{ProvisioningError, ProvisioningResult};
pub use tenant_registry::{SqliteTenantRegistry, StaticTenantRegistry, TenantRegistry};
