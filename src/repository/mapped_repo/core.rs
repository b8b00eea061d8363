use super::mapping::Mapped;
use super::query::{insert_entity, update_entity_columns, Direction, EntityQuery, Predicate};
use crate::domain::{ArticleSet, Depot, FilterOptions, SortOrder};
use crate::repository::blocking::{run_blocking, RepositoryOptions};
use crate::repository::connection_factory::SqliteConnectionFactory;
use crate::repository::depot_repo::{DepotRepository, MutationOutcome};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use rusqlite::types::Value;

// ==========================================
// MappedDepotRepository - descriptor-driven driver
// ==========================================
// Queries are composed with EntityQuery; reads return detached owned
// values, nothing is tracked after the connection closes.
pub struct MappedDepotRepository {
    factory: SqliteConnectionFactory,
    options: RepositoryOptions,
}

impl MappedDepotRepository {
    pub fn new(factory: SqliteConnectionFactory, options: RepositoryOptions) -> Self {
        Self { factory, options }
    }

    /// Convenience constructor from a database path with default options
    pub fn open(connection_string: impl Into<String>) -> Self {
        Self::new(
            SqliteConnectionFactory::new(connection_string),
            RepositoryOptions::default(),
        )
    }

    fn list_query(options: &FilterOptions) -> EntityQuery<Depot> {
        let mut query = EntityQuery::<Depot>::new();

        if let Some(term) = options.search_term() {
            query = query.filter(Predicate::Contains(
                options.search_field().column(),
                term.to_string(),
            ));
        }

        query = match options.sort() {
            SortOrder::Default => query.order_by("Id", Direction::Desc),
            SortOrder::NameAsc => query
                .order_by("Name", Direction::Asc)
                .order_by("Id", Direction::Desc),
            SortOrder::NameDesc => query
                .order_by("Name", Direction::Desc)
                .order_by("Id", Direction::Desc),
        };

        query
    }
}

#[async_trait]
impl DepotRepository for MappedDepotRepository {
    async fn add(&self, depot: Depot) -> RepositoryResult<Depot> {
        let factory = self.factory.clone();
        run_blocking("mapped.add", self.options.operation_timeout, move || {
            let mut depot = depot.prepare_for_insert();
            let conn = factory.open()?;
            depot.id = insert_entity(&conn, &depot)?;
            tracing::debug!(id = depot.id, "depot inserted");
            Ok(depot)
        })
        .await
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Depot>> {
        let factory = self.factory.clone();
        run_blocking("mapped.get_all", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            EntityQuery::<Depot>::new()
                .order_by(Depot::table().key_column(), Direction::Desc)
                .fetch(&conn)
        })
        .await
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Depot>> {
        let factory = self.factory.clone();
        run_blocking("mapped.get_by_id", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            EntityQuery::<Depot>::new().by_key(id).first(&conn)
        })
        .await
    }

    async fn update(&self, depot: &Depot) -> RepositoryResult<MutationOutcome> {
        let factory = self.factory.clone();
        let id = depot.key();
        let assignments = vec![
            ("Active", Value::from(depot.is_active())),
            ("Name", Value::from(depot.name.clone())),
        ];
        run_blocking("mapped.update", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let rows = update_entity_columns::<Depot>(&conn, id, &assignments)?;
            Ok(MutationOutcome::from_rows_affected(rows))
        })
        .await
    }

    async fn delete(&self, id: i64) -> RepositoryResult<MutationOutcome> {
        let factory = self.factory.clone();
        run_blocking("mapped.delete", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let rows = update_entity_columns::<Depot>(&conn, id, &[("IsDeleted", Value::from(true))])?;
            Ok(MutationOutcome::from_rows_affected(rows))
        })
        .await
    }

    async fn list(&self, options: &FilterOptions) -> RepositoryResult<ArticleSet<Depot>> {
        let factory = self.factory.clone();
        let query = Self::list_query(options);
        let (skip, take) = (options.offset(), options.limit());
        run_blocking("mapped.list", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let total_count = query.count(&conn)?;
            let items = query.skip(skip).take(take).fetch(&conn)?;
            Ok(ArticleSet::new(items, total_count))
        })
        .await
    }

    fn driver_name(&self) -> &'static str {
        "mapped"
    }
}
