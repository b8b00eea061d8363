// ==========================================
// Depot Management - application state
// ==========================================
// Composition root output: built once in main, shared by reference
// with the HTTP layer and services. No globals.
// ==========================================

use crate::app::registration::{register_depot_repository, RepositoryMode};
use crate::config::DepotAppConfig;
use crate::repository::{DepotRepository, RepositoryOptions};
use crate::service::DepotFormService;
use std::sync::Arc;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Database path
    pub db_path: String,

    /// Driver behind `depots`
    pub repository_mode: RepositoryMode,

    /// Depot repository
    pub depots: Arc<dyn DepotRepository>,

    /// Form save workflow over `depots`
    pub depot_form: Arc<DepotFormService>,
}

impl AppState {
    /// Compose the state from an existing repository
    pub fn new(
        db_path: impl Into<String>,
        repository_mode: RepositoryMode,
        depots: Arc<dyn DepotRepository>,
    ) -> Self {
        let depot_form = Arc::new(DepotFormService::new(depots.clone()));
        Self {
            db_path: db_path.into(),
            repository_mode,
            depots,
            depot_form,
        }
    }

    /// Compose the state from configuration
    pub fn from_config(config: &DepotAppConfig) -> Self {
        let options = RepositoryOptions::with_timeout(config.operation_timeout);
        let depots = register_depot_repository(&config.db_path, config.repository_mode, options);
        tracing::info!(
            db = %config.db_path,
            driver = depots.driver_name(),
            "application state ready"
        );
        Self::new(config.db_path.clone(), config.repository_mode, depots)
    }
}
