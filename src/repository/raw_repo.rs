// ==========================================
// Depot Management - raw Depot repository
// ==========================================
// Hand-bound positional parameters (raw_bind_parameter) and typed
// ValueRef reads with explicit NULL handling.
// ==========================================

use crate::domain::{format_created_at, parse_created_at, ArticleSet, Depot, FilterOptions};
use crate::repository::blocking::{run_blocking, RepositoryOptions};
use crate::repository::connection_factory::SqliteConnectionFactory;
use crate::repository::depot_repo::{DepotRepository, MutationOutcome};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::clamp_i64;
use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};

const SELECT_COLUMNS: &str = "SELECT Id, Active, IsDeleted, CreatedAt, CreatedBy, Name FROM Depots";

// ===== column readers =====

fn read_i64(row: &Row<'_>, idx: usize, column: &'static str) -> RepositoryResult<i64> {
    row.get_ref(idx)?
        .as_i64()
        .map_err(|e| RepositoryError::row_mapping(column, e))
}

fn read_flag(row: &Row<'_>, idx: usize, column: &'static str) -> RepositoryResult<Option<bool>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        value => value
            .as_i64()
            .map(|v| Some(v != 0))
            .map_err(|e| RepositoryError::row_mapping(column, e)),
    }
}

fn read_text(row: &Row<'_>, idx: usize, column: &'static str) -> RepositoryResult<Option<String>> {
    row.get_ref(idx)?
        .as_str_or_null()
        .map(|v| v.map(str::to_string))
        .map_err(|e| RepositoryError::row_mapping(column, e))
}

fn read_depot(row: &Row<'_>) -> RepositoryResult<Depot> {
    let created_at_raw = read_text(row, 3, "CreatedAt")?
        .ok_or_else(|| RepositoryError::row_mapping("CreatedAt", "unexpected NULL"))?;
    let created_at = parse_created_at(&created_at_raw)
        .map_err(|e| RepositoryError::row_mapping("CreatedAt", e))?;

    Ok(Depot {
        id: read_i64(row, 0, "Id")?,
        active: read_flag(row, 1, "Active")?,
        is_deleted: read_flag(row, 2, "IsDeleted")?.unwrap_or(false),
        created_at,
        created_by: read_text(row, 4, "CreatedBy")?,
        name: read_text(row, 5, "Name")?,
    })
}

/// Prepare `sql`, bind `params` in order (1-based), collect all depots
fn query_depots(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> RepositoryResult<Vec<Depot>> {
    let mut stmt = conn.prepare(sql)?;
    for (i, param) in params.iter().enumerate() {
        stmt.raw_bind_parameter(i + 1, param)?;
    }

    let mut rows = stmt.raw_query();
    let mut depots = Vec::new();
    while let Some(row) = rows.next()? {
        depots.push(read_depot(row)?);
    }
    Ok(depots)
}

fn execute_raw(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> RepositoryResult<usize> {
    let mut stmt = conn.prepare(sql)?;
    for (i, param) in params.iter().enumerate() {
        stmt.raw_bind_parameter(i + 1, param)?;
    }
    Ok(stmt.raw_execute()?)
}

// ==========================================
// RawDepotRepository
// ==========================================
pub struct RawDepotRepository {
    factory: SqliteConnectionFactory,
    options: RepositoryOptions,
}

impl RawDepotRepository {
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
impl DepotRepository for RawDepotRepository {
    async fn add(&self, depot: Depot) -> RepositoryResult<Depot> {
        let factory = self.factory.clone();
        run_blocking("raw.add", self.options.operation_timeout, move || {
            let mut depot = depot.prepare_for_insert();
            let conn = factory.open()?;
            let mut stmt = conn.prepare(
                "INSERT INTO Depots (Active, IsDeleted, CreatedAt, CreatedBy, Name) \
                 VALUES (?1, ?2, ?3, ?4, ?5) RETURNING Id",
            )?;
            stmt.raw_bind_parameter(1, depot.is_active())?;
            stmt.raw_bind_parameter(2, depot.is_deleted)?;
            stmt.raw_bind_parameter(3, format_created_at(&depot.created_at))?;
            stmt.raw_bind_parameter(4, depot.created_by.as_deref())?;
            stmt.raw_bind_parameter(5, depot.name.as_deref())?;

            let mut rows = stmt.raw_query();
            let id = match rows.next()? {
                Some(row) => match row.get_ref(0)? {
                    ValueRef::Integer(id) if id > 0 => Some(id),
                    _ => None,
                },
                None => None,
            };

            depot.id = id.ok_or_else(|| RepositoryError::MissingIdentifier {
                entity: "Depot".to_string(),
            })?;
            tracing::debug!(id = depot.id, "depot inserted");
            Ok(depot)
        })
        .await
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Depot>> {
        let factory = self.factory.clone();
        run_blocking("raw.get_all", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let sql = format!("{} WHERE IsDeleted = 0 ORDER BY Id DESC", SELECT_COLUMNS);
            query_depots(&conn, &sql, &[])
        })
        .await
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Depot>> {
        let factory = self.factory.clone();
        run_blocking("raw.get_by_id", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let sql = format!("{} WHERE Id = ?1 AND IsDeleted = 0", SELECT_COLUMNS);
            let mut depots = query_depots(&conn, &sql, &[&id])?;
            Ok(depots.pop())
        })
        .await
    }

    async fn update(&self, depot: &Depot) -> RepositoryResult<MutationOutcome> {
        let factory = self.factory.clone();
        let (id, active, name) = (depot.id, depot.is_active(), depot.name.clone());
        run_blocking("raw.update", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let rows = execute_raw(
                &conn,
                "UPDATE Depots SET Active = ?1, Name = ?2 WHERE Id = ?3 AND IsDeleted = 0",
                &[&active, &name, &id],
            )?;
            Ok(MutationOutcome::from_rows_affected(rows))
        })
        .await
    }

    async fn delete(&self, id: i64) -> RepositoryResult<MutationOutcome> {
        let factory = self.factory.clone();
        run_blocking("raw.delete", self.options.operation_timeout, move || {
            let conn = factory.open()?;
            let rows = execute_raw(
                &conn,
                "UPDATE Depots SET IsDeleted = 1 WHERE Id = ?1 AND IsDeleted = 0",
                &[&id],
            )?;
            Ok(MutationOutcome::from_rows_affected(rows))
        })
        .await
    }

    async fn list(&self, options: &FilterOptions) -> RepositoryResult<ArticleSet<Depot>> {
        let factory = self.factory.clone();
        let search = options.search_term().map(str::to_string);
        let column = options.search_field().column();
        let order_by = options.sort().order_by_clause();
        let take = clamp_i64(options.limit());
        let skip = clamp_i64(options.offset());

        run_blocking("raw.list", self.options.operation_timeout, move || {
            let conn = factory.open()?;

            let mut filter = String::from(" WHERE IsDeleted = 0");
            if search.is_some() {
                filter.push_str(&format!(" AND instr({}, ?1) > 0", column));
            }

            let mut count_stmt = conn.prepare(&format!("SELECT COUNT(*) FROM Depots{}", filter))?;
            if let Some(term) = &search {
                count_stmt.raw_bind_parameter(1, term)?;
            }
            let mut count_rows = count_stmt.raw_query();
            let total = match count_rows.next()? {
                Some(row) => read_i64(row, 0, "COUNT(*)")?,
                None => 0,
            };

            let (limit_idx, offset_idx) = if search.is_some() { (2, 3) } else { (1, 2) };
            let sql = format!(
                "{}{} ORDER BY {} LIMIT ?{} OFFSET ?{}",
                SELECT_COLUMNS, filter, order_by, limit_idx, offset_idx
            );
            let items = match &search {
                Some(term) => query_depots(&conn, &sql, &[term, &take, &skip])?,
                None => query_depots(&conn, &sql, &[&take, &skip])?,
            };

            Ok(ArticleSet::new(items, u64::try_from(total).unwrap_or(0)))
        })
        .await
    }

    fn driver_name(&self) -> &'static str {
        "raw"
    }
}
