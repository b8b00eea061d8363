// ==========================================
// Depot Management - domain layer
// ==========================================
// Entities, list options and validation rules
// No data access here
// ==========================================

pub mod article_set;
pub mod depot;
pub mod filter;
pub mod validation;

pub use article_set::ArticleSet;
pub use depot::{format_created_at, now_utc, parse_created_at, Depot, DEPOTS_TABLE};
pub use filter::{FilterOptions, SearchField, SortOrder};
pub use validation::{validate_name, ValidationError, MAX_NAME_LENGTH};
