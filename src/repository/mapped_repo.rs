// ==========================================
// Depot Management - mapped Depot repository
// ==========================================
// Table descriptors + Mapped conversions + EntityQuery composition
// ==========================================

mod core;
pub mod mapping;
pub mod query;
pub mod table;

pub use self::core::MappedDepotRepository;
pub use mapping::Mapped;
pub use query::{Direction, EntityQuery, Predicate};
pub use table::{ColumnDescriptor, TableDescriptor};
