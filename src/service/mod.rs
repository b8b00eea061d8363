// ==========================================
// Depot Management - services
// ==========================================

pub mod depot_form_service;

pub use depot_form_service::{DepotFormService, FormError, SaveOutcome, ANONYMOUS_USER};
