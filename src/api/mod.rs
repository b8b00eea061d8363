// ==========================================
// Depot Management - HTTP layer
// ==========================================
// Handlers only translate HTTP <-> repository/service calls
// ==========================================

pub mod depot_download;
pub mod depots;
pub mod error;

pub use error::ApiError;

use crate::app::AppState;
use axum::routing::get;
use axum::Router;

/// All routes, bound to the application state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            depot_download::EXCEL_DOWN_PATH,
            get(depot_download::excel_down),
        )
        .route(
            depots::DEPOTS_PATH,
            get(depots::list_depots).post(depots::save_depot),
        )
        .route(
            depots::DEPOT_BY_ID_PATH,
            get(depots::get_depot).delete(depots::delete_depot),
        )
        .with_state(state)
}
