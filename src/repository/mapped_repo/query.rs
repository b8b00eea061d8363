// ==========================================
// EntityQuery - typed query composition for mapped entities
// ==========================================
// Soft-deleted rows are excluded by every query built here.
// ==========================================

use super::mapping::Mapped;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::SqlQueryBuilder;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::marker::PhantomData;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(&'static str, Value),
    /// Case-sensitive substring match
    Contains(&'static str, String),
}

impl Predicate {
    fn into_bound(self) -> (String, Value) {
        match self {
            Predicate::Eq(column, value) => (format!("{} = ?", column), value),
            Predicate::Contains(column, needle) => {
                (format!("instr({}, ?) > 0", column), Value::Text(needle))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Predicates, ordering and skip/take over one mapped entity
#[derive(Debug)]
pub struct EntityQuery<T: Mapped> {
    predicates: Vec<Predicate>,
    ordering: Vec<(&'static str, Direction)>,
    skip: Option<u64>,
    take: Option<u64>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Mapped> Clone for EntityQuery<T> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
            ordering: self.ordering.clone(),
            skip: self.skip,
            take: self.take,
            _entity: PhantomData,
        }
    }
}

impl<T: Mapped> Default for EntityQuery<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Mapped> EntityQuery<T> {
    /// Query over all live rows of the entity's table
    pub fn new() -> Self {
        let mut predicates = Vec::new();
        if let Some(flag) = T::table().soft_delete {
            predicates.push(Predicate::Eq(flag, Value::Integer(0)));
        }
        Self {
            predicates,
            ordering: Vec::new(),
            skip: None,
            take: None,
            _entity: PhantomData,
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn by_key(self, key: i64) -> Self {
        let column = T::table().key_column();
        self.filter(Predicate::Eq(column, Value::Integer(key)))
    }

    pub fn order_by(mut self, column: &'static str, direction: Direction) -> Self {
        self.ordering.push((column, direction));
        self
    }

    pub fn skip(mut self, rows: u64) -> Self {
        self.skip = Some(rows);
        self
    }

    pub fn take(mut self, rows: u64) -> Self {
        self.take = Some(rows);
        self
    }

    fn filtered(&self, select: &str) -> SqlQueryBuilder {
        self.predicates
            .iter()
            .cloned()
            .map(Predicate::into_bound)
            .fold(SqlQueryBuilder::new(select), |builder, (cond, value)| {
                builder.where_bound(&cond, value)
            })
    }

    /// SELECT for the page described by the query
    pub fn to_select_sql(&self) -> (String, Vec<Value>) {
        let table = T::table();
        let mut builder =
            self.filtered(&format!("SELECT {} FROM {}", table.select_list(), table.name));

        if !self.ordering.is_empty() {
            let order = self
                .ordering
                .iter()
                .map(|(column, direction)| format!("{} {}", column, direction.keyword()))
                .collect::<Vec<_>>()
                .join(", ");
            builder = builder.order_by(&order);
        }

        if self.skip.is_some() || self.take.is_some() {
            // SQLite only accepts OFFSET after a LIMIT
            let take = self.take.unwrap_or(i64::MAX as u64);
            builder = builder.limit_offset(take, self.skip.unwrap_or(0));
        }

        builder.build()
    }

    /// COUNT(*) over the predicates only; ordering and paging are ignored
    pub fn to_count_sql(&self) -> (String, Vec<Value>) {
        self.filtered(&format!("SELECT COUNT(*) FROM {}", T::table().name))
            .build()
    }

    /// Materialize the matching rows as owned entities
    pub fn fetch(&self, conn: &Connection) -> RepositoryResult<Vec<T>> {
        let (sql, params) = self.to_select_sql();
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;

        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(T::from_row(row)?);
        }
        Ok(entities)
    }

    pub fn first(&self, conn: &Connection) -> RepositoryResult<Option<T>> {
        let mut entities = self.clone().take(1).fetch(conn)?;
        Ok(entities.pop())
    }

    pub fn count(&self, conn: &Connection) -> RepositoryResult<u64> {
        let (sql, params) = self.to_count_sql();
        let total: i64 = conn.query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

// ==========================================
// Writes
// ==========================================

/// INSERT the entity's non-key columns; returns the assigned key
pub fn insert_entity<T: Mapped>(conn: &Connection, entity: &T) -> RepositoryResult<i64> {
    let table = T::table();
    let values = entity.insert_values();
    let columns = values.iter().map(|(c, _)| *c).collect::<Vec<_>>().join(", ");
    let placeholders = vec!["?"; values.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table.name,
        columns,
        placeholders,
        table.key_column()
    );

    let key: Option<i64> = conn
        .query_row(&sql, params_from_iter(values.iter().map(|(_, v)| v)), |row| {
            row.get(0)
        })
        .optional()?;

    key.filter(|k| *k > 0)
        .ok_or_else(|| RepositoryError::MissingIdentifier {
            entity: table.name.to_string(),
        })
}

/// UPDATE the given columns of one live row; returns rows affected
pub fn update_entity_columns<T: Mapped>(
    conn: &Connection,
    key: i64,
    assignments: &[(&'static str, Value)],
) -> RepositoryResult<usize> {
    let table = T::table();
    let set_clause = assignments
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        table.name,
        set_clause,
        table.key_column()
    );
    if let Some(flag) = table.soft_delete {
        sql.push_str(&format!(" AND {} = 0", flag));
    }

    let params = assignments
        .iter()
        .map(|(_, value)| value.clone())
        .chain(std::iter::once(Value::Integer(key)));
    Ok(conn.execute(&sql, params_from_iter(params))?)
}
