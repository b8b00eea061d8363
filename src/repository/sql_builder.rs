// ==========================================
// Depot Management - SQL builder
// ==========================================
// Fluent SELECT composition with positional `?` placeholders.
// Values travel next to the SQL text and are always bound, never
// formatted into it.
// ==========================================

use rusqlite::types::Value;

/// SQL query builder (fluent API)
///
/// # Example
/// ```
/// use depot_management::repository::sql_builder::SqlQueryBuilder;
/// use rusqlite::types::Value;
///
/// let (sql, params) = SqlQueryBuilder::new("SELECT * FROM Depots")
///     .where_clause("IsDeleted = 0")
///     .and_if(Some(("instr(Name, ?) > 0", Value::Text("Main".into()))))
///     .order_by("Id DESC")
///     .limit_offset(10, 20)
///     .build();
///
/// assert_eq!(
///     sql,
///     "SELECT * FROM Depots WHERE IsDeleted = 0 AND instr(Name, ?) > 0 ORDER BY Id DESC LIMIT ? OFFSET ?"
/// );
/// assert_eq!(params.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    order_by_clause: Option<String>,
    page: Option<(i64, i64)>,
    params: Vec<Value>,
}

impl SqlQueryBuilder {
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            where_clauses: Vec::new(),
            order_by_clause: None,
            page: None,
            params: Vec::new(),
        }
    }

    /// Add a condition without placeholders
    pub fn where_clause(mut self, condition: &str) -> Self {
        self.where_clauses.push(condition.to_string());
        self
    }

    /// Add a condition with one `?` and its value
    pub fn where_bound(mut self, condition: &str, value: Value) -> Self {
        self.where_clauses.push(condition.to_string());
        self.params.push(value);
        self
    }

    /// Add a bound condition only when present
    pub fn and_if(self, condition: Option<(&str, Value)>) -> Self {
        match condition {
            Some((cond, value)) => self.where_bound(cond, value),
            None => self,
        }
    }

    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    /// Bound LIMIT/OFFSET; values above i64::MAX are clamped
    pub fn limit_offset(mut self, limit: u64, offset: u64) -> Self {
        self.page = Some((clamp_i64(limit), clamp_i64(offset)));
        self
    }

    /// Final SQL text and its parameters in placeholder order
    pub fn build(&self) -> (String, Vec<Value>) {
        let mut sql = self.select_clause.clone();
        let mut params = self.params.clone();

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if let Some((limit, offset)) = self.page {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(Value::Integer(limit));
            params.push(Value::Integer(offset));
        }

        (sql, params)
    }
}

/// Saturating u64 -> i64 for SQLite integer binding
pub fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
