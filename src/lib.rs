// ==========================================
// Depot Management - core library
// ==========================================
// Stack: Rust + SQLite (rusqlite) + axum
// Depot master data: one repository contract, three drivers,
// schema convergence for master/tenant databases, xlsx export
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain layer - entities, list options, validation
pub mod domain;

// Repository layer - data access
pub mod repository;

// Schema provisioning - Depots table convergence
pub mod schema;

// Services - form workflow
pub mod service;

// Spreadsheet export
pub mod export;

// Configuration
pub mod config;

// Database infrastructure (connection setup / PRAGMA)
pub mod db;

// Logging
pub mod logging;

// HTTP layer
pub mod api;

// Application layer - composition
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use app::{register_depot_repository, AppState, RepositoryMode};
pub use config::DepotAppConfig;
pub use domain::{ArticleSet, Depot, FilterOptions, SortOrder, ValidationError};
pub use repository::{
    DepotRepository, DepotRepositoryExt, MappedDepotRepository, MutationOutcome,
    RawDepotRepository, RepositoryError, RepositoryOptions, RepositoryResult,
    TemplatedDepotRepository,
};
pub use schema::{ConvergenceReport, DepotsTableBuilder, ProvisionTarget, SeedPolicy};
pub use service::{DepotFormService, SaveOutcome};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Depot Management";
