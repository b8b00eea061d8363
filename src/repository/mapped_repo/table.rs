// ==========================================
// Table descriptors for the mapped driver
// ==========================================

/// One mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    /// Store-assigned primary key; never written on insert
    pub key: bool,
}

impl ColumnDescriptor {
    pub const fn key(name: &'static str) -> Self {
        Self { name, key: true }
    }

    pub const fn data(name: &'static str) -> Self {
        Self { name, key: false }
    }
}

/// Table name, columns in select order, and the soft-delete flag column
#[derive(Debug, Clone, Copy)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub columns: &'static [ColumnDescriptor],
    pub soft_delete: Option<&'static str>,
}

impl TableDescriptor {
    /// Primary key column name
    pub fn key_column(&self) -> &'static str {
        self.columns
            .iter()
            .find(|c| c.key)
            .map(|c| c.name)
            .unwrap_or("Id")
    }

    /// Comma-separated column list in descriptor order
    pub fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Position of a column in `select_list`
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }
}
