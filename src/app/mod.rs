// ==========================================
// Depot Management - application layer
// ==========================================
// Composition: configuration -> driver -> services -> state
// ==========================================

pub mod registration;
pub mod state;

pub use registration::{register_depot_repository, RepositoryMode};
pub use state::AppState;
