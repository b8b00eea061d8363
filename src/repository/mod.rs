// ==========================================
// Depot Management - repository layer
// ==========================================
// Rule: repositories hold no business logic
// Rule: every query is parameterized
// ==========================================
// One contract (DepotRepository), three interchangeable drivers:
// - mapped:    table descriptors + EntityQuery
// - templated: fixed named-parameter statements
// - raw:       hand-bound commands and typed column reads
// ==========================================

pub mod blocking;
pub mod connection_factory;
pub mod depot_repo;
pub mod error;
pub mod mapped_repo;
pub mod raw_repo;
pub mod sql_builder;
pub mod templated_repo;

pub use blocking::{RepositoryOptions, DEFAULT_OPERATION_TIMEOUT};
pub use connection_factory::SqliteConnectionFactory;
pub use depot_repo::{DepotRepository, DepotRepositoryExt, MutationOutcome};
pub use error::{RepositoryError, RepositoryResult};
pub use mapped_repo::MappedDepotRepository;
pub use raw_repo::RawDepotRepository;
pub use templated_repo::TemplatedDepotRepository;
