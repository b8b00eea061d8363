// ==========================================
// Depot Management - templated-SQL Depot repository
// ==========================================
// One fixed statement per operation, named parameters, rows read by
// column name.
// ==========================================

use crate::domain::{format_created_at, ArticleSet, Depot, FilterOptions, SearchField, SortOrder};
use crate::repository::blocking::{run_blocking, RepositoryOptions};
use crate::repository::connection_factory::SqliteConnectionFactory;
use crate::repository::depot_repo::{DepotRepository, MutationOutcome};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::clamp_i64;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use rusqlite::{named_params, OptionalExtension, Row};

// ===== statements =====

const INSERT_SQL: &str = r#"
    INSERT INTO Depots (Active, IsDeleted, CreatedAt, CreatedBy, Name)
    VALUES (:active, 0, :created_at, :created_by, :name)
    RETURNING Id
"#;

const SELECT_ALL_SQL: &str = r#"
    SELECT Id, Active, IsDeleted, CreatedAt, CreatedBy, Name
    FROM Depots
    WHERE IsDeleted = 0
    ORDER BY Id DESC
"#;

const SELECT_BY_ID_SQL: &str = r#"
    SELECT Id, Active, IsDeleted, CreatedAt, CreatedBy, Name
    FROM Depots
    WHERE Id = :id AND IsDeleted = 0
"#;

const UPDATE_SQL: &str = r#"
    UPDATE Depots
    SET Active = :active, Name = :name
    WHERE Id = :id AND IsDeleted = 0
"#;

const SOFT_DELETE_SQL: &str = r#"
    UPDATE Depots
    SET IsDeleted = 1
    WHERE Id = :id AND IsDeleted = 0
"#;

// :sort 0 = Id DESC, 1 = Name ASC, 2 = Name DESC
const LIST_SQL: &str = r#"
    SELECT Id, Active, IsDeleted, CreatedAt, CreatedBy, Name
    FROM Depots
    WHERE IsDeleted = 0
      AND (:search IS NULL OR instr(Name, :search) > 0)
    ORDER BY
      CASE WHEN :sort = 1 THEN Name END ASC,
      CASE WHEN :sort = 2 THEN Name END DESC,
      Id DESC
    LIMIT :take OFFSET :skip
"#;

const COUNT_SQL: &str = r#"
    SELECT COUNT(*)
    FROM Depots
    WHERE IsDeleted = 0
      AND (:search IS NULL OR instr(Name, :search) > 0)
"#;

fn sort_code(sort: SortOrder) -> i64 {
    match sort {
        SortOrder::Default => 0,
        SortOrder::NameAsc => 1,
        SortOrder::NameDesc => 2,
    }
}

/// (list, count) statements whose search runs over `field`'s column
fn search_statements(field: SearchField) -> (&'static str, &'static str) {
    match field {
        SearchField::Name => (LIST_SQL, COUNT_SQL),
    }
}

fn map_depot(row: &Row<'_>) -> rusqlite::Result<Depot> {
    Ok(Depot {
        id: row.get("Id")?,
        active: row.get("Active")?,
        is_deleted: row.get::<_, Option<bool>>("IsDeleted")?.unwrap_or(false),
        created_at: row.get::<_, DateTime<FixedOffset>>("CreatedAt")?,
        created_by: row.get("CreatedBy")?,
        name: row.get("Name")?,
    })
}

// ==========================================
// TemplatedDepotRepository
// ==========================================
pub struct TemplatedDepotRepository {
    factory: SqliteConnectionFactory,
    options: RepositoryOptions,
}

impl TemplatedDepotRepository {
    pub fn new(factory: SqliteConnectionFactory, options: RepositoryOptions) -> Self {
        Self { factory, options }
    }

    pub fn open(connection_string: impl Into<String>) -> Self {
        Self::new(
            SqliteConnectionFactory::new(connection_string),
            RepositoryOptions::default(),
        )
    }
}

#[async_trait]
impl DepotRepository for TemplatedDepotRepository {
    async fn add(&self, depot: Depot) -> RepositoryResult<Depot> {
        let factory = self.factory.clone();
        run_blocking("templated.add", self.options.operation_timeout, move || {
            let mut depot = depot.prepare_for_insert();
            let conn = factory.open()?;
            let id: Option<i64> = conn
                .query_row(
                    INSERT_SQL,
                    named_params! {
                        ":active": depot.is_active(),
                        ":created_at": format_created_at(&depot.created_at),
                        ":created_by": depot.created_by,
                        ":name": depot.name,
                    },
                    |row| row.get(0),
                )
                .optional()?;

            depot.id = id.filter(|id| *id > 0).ok_or_else(|| {
                RepositoryError::MissingIdentifier {
                    entity: "Depot".to_string(),
                }
            })?;
            tracing::debug!(id = depot.id, "depot inserted");
            Ok(depot)
        })
        .await
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Depot>> {
        let factory = self.factory.clone();
        run_blocking("templated.get_all", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let mut stmt = conn.prepare(SELECT_ALL_SQL)?;
            let depots = stmt
                .query_map([], map_depot)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(depots)
        })
        .await
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Depot>> {
        let factory = self.factory.clone();
        run_blocking("templated.get_by_id", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let depot = conn
                .query_row(SELECT_BY_ID_SQL, named_params! { ":id": id }, map_depot)
                .optional()?;
            Ok(depot)
        })
        .await
    }

    async fn update(&self, depot: &Depot) -> RepositoryResult<MutationOutcome> {
        let factory = self.factory.clone();
        let (id, active, name) = (depot.id, depot.is_active(), depot.name.clone());
        run_blocking("templated.update", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let rows = conn.execute(
                UPDATE_SQL,
                named_params! { ":id": id, ":active": active, ":name": name },
            )?;
            Ok(MutationOutcome::from_rows_affected(rows))
        })
        .await
    }

    async fn delete(&self, id: i64) -> RepositoryResult<MutationOutcome> {
        let factory = self.factory.clone();
        run_blocking("templated.delete", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let rows = conn.execute(SOFT_DELETE_SQL, named_params! { ":id": id })?;
            Ok(MutationOutcome::from_rows_affected(rows))
        })
        .await
    }

    async fn list(&self, options: &FilterOptions) -> RepositoryResult<ArticleSet<Depot>> {
        let factory = self.factory.clone();
        let search = options.search_term().map(str::to_string);
        let (list_sql, count_sql) = search_statements(options.search_field());
        let sort = sort_code(options.sort());
        let take = clamp_i64(options.limit());
        let skip = clamp_i64(options.offset());

        run_blocking("templated.list", self.options.operation_timeout, move || {
            let conn = factory.open()?;

            let total: i64 = conn.query_row(
                count_sql,
                named_params! { ":search": search },
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(list_sql)?;
            let items = stmt
                .query_map(
                    named_params! {
                        ":search": search,
                        ":sort": sort,
                        ":take": take,
                        ":skip": skip,
                    },
                    map_depot,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(ArticleSet::new(items, u64::try_from(total).unwrap_or(0)))
        })
        .await
    }

    fn driver_name(&self) -> &'static str {
        "templated"
    }
}
