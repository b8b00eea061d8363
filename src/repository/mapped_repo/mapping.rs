// ==========================================
// Row <-> entity mapping
// ==========================================

use super::table::{ColumnDescriptor, TableDescriptor};
use crate::domain::{format_created_at, parse_created_at, Depot, DEPOTS_TABLE};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Value;
use rusqlite::Row;

/// An entity with a table descriptor and row conversions
pub trait Mapped: Sized + Send + 'static {
    fn table() -> &'static TableDescriptor;

    /// Primary key value (0 when not yet stored)
    fn key(&self) -> i64;

    /// Build an owned entity from a row selected with `select_list`
    fn from_row(row: &Row<'_>) -> RepositoryResult<Self>;

    /// Non-key column values, in insert order
    fn insert_values(&self) -> Vec<(&'static str, Value)>;
}

// ===== Depot =====

static DEPOT_TABLE: TableDescriptor = TableDescriptor {
    name: DEPOTS_TABLE,
    columns: &[
        ColumnDescriptor::key("Id"),
        ColumnDescriptor::data("Active"),
        ColumnDescriptor::data("IsDeleted"),
        ColumnDescriptor::data("CreatedAt"),
        ColumnDescriptor::data("CreatedBy"),
        ColumnDescriptor::data("Name"),
    ],
    soft_delete: Some("IsDeleted"),
};

fn column_index(column: &'static str) -> RepositoryResult<usize> {
    DEPOT_TABLE
        .position(column)
        .ok_or_else(|| RepositoryError::row_mapping(column, "column not mapped"))
}

impl Mapped for Depot {
    fn table() -> &'static TableDescriptor {
        &DEPOT_TABLE
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row<'_>) -> RepositoryResult<Self> {
        let created_at_raw: String = row.get(column_index("CreatedAt")?)?;
        let created_at = parse_created_at(&created_at_raw)
            .map_err(|e| RepositoryError::row_mapping("CreatedAt", e))?;

        Ok(Depot {
            id: row.get(column_index("Id")?)?,
            active: row.get::<_, Option<bool>>(column_index("Active")?)?,
            is_deleted: row
                .get::<_, Option<bool>>(column_index("IsDeleted")?)?
                .unwrap_or(false),
            created_at,
            created_by: row.get(column_index("CreatedBy")?)?,
            name: row.get(column_index("Name")?)?,
        })
    }

    fn insert_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("Active", Value::from(self.is_active())),
            ("IsDeleted", Value::from(self.is_deleted)),
            ("CreatedAt", Value::Text(format_created_at(&self.created_at))),
            ("CreatedBy", Value::from(self.created_by.clone())),
            ("Name", Value::from(self.name.clone())),
        ]
    }
}
