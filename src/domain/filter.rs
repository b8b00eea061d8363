// ==========================================
// Depot Management - list filter options
// ==========================================
// One value per list request: paging + search + sort
// ==========================================

use serde::{Deserialize, Serialize};

/// Paging/search/sort options for a list request
///
/// `parent_identifier` is opaque to Depot; it exists so every entity list in
/// the application takes the same options shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions<P = ()> {
    pub page_index: u32,
    pub page_size: u32,
    pub search_field: String,
    pub search_query: String,
    pub sort_order: String,
    pub parent_identifier: P,
}

impl Default for FilterOptions<()> {
    fn default() -> Self {
        Self::page(0, 10)
    }
}

impl FilterOptions<()> {
    /// Unfiltered, default-ordered page
    pub fn page(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
            search_field: String::new(),
            search_query: String::new(),
            sort_order: String::new(),
            parent_identifier: (),
        }
    }
}

impl<P> FilterOptions<P> {
    pub fn with_search(mut self, field: impl Into<String>, query: impl Into<String>) -> Self {
        self.search_field = field.into();
        self.search_query = query.into();
        self
    }

    pub fn with_sort(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = sort_order.into();
        self
    }

    pub fn with_parent<Q>(self, parent_identifier: Q) -> FilterOptions<Q> {
        FilterOptions {
            page_index: self.page_index,
            page_size: self.page_size,
            search_field: self.search_field,
            search_query: self.search_query,
            sort_order: self.sort_order,
            parent_identifier,
        }
    }

    /// Copy of the options with the parent identifier dropped
    pub fn without_parent(&self) -> FilterOptions<()> {
        FilterOptions {
            page_index: self.page_index,
            page_size: self.page_size,
            search_field: self.search_field.clone(),
            search_query: self.search_query.clone(),
            sort_order: self.sort_order.clone(),
            parent_identifier: (),
        }
    }

    /// Rows to skip: page_index * page_size
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.page_size)
    }

    /// Rows to take
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// Query matched verbatim; only an empty query disables the filter
    pub fn search_term(&self) -> Option<&str> {
        if self.search_query.is_empty() {
            None
        } else {
            Some(&self.search_query)
        }
    }

    pub fn search_field(&self) -> SearchField {
        SearchField::parse(&self.search_field)
    }

    pub fn sort(&self) -> SortOrder {
        SortOrder::parse(&self.sort_order)
    }
}

// ==========================================
// SearchField - searchable columns
// ==========================================
/// Every driver resolves the searched column from this enum; a new
/// variant needs a matching statement in the templated driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Name,
}

impl SearchField {
    /// Only `Name` is searchable; anything else falls back to it
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if !raw.is_empty() && !raw.eq_ignore_ascii_case("name") {
            tracing::debug!(field = raw, "unsupported search field, searching Name instead");
        }
        SearchField::Name
    }

    pub fn column(self) -> &'static str {
        match self {
            SearchField::Name => "Name",
        }
    }
}

// ==========================================
// SortOrder - list ordering
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first (Id DESC)
    #[default]
    Default,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    /// Tokens: "Name" / "NameDesc" (case-insensitive); anything else is Default
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("name") {
            SortOrder::NameAsc
        } else if token.eq_ignore_ascii_case("namedesc") {
            SortOrder::NameDesc
        } else {
            SortOrder::Default
        }
    }

    /// ORDER BY clause (without the keyword)
    pub fn order_by_clause(self) -> &'static str {
        match self {
            SortOrder::Default => "Id DESC",
            SortOrder::NameAsc => "Name ASC, Id DESC",
            SortOrder::NameDesc => "Name DESC, Id DESC",
        }
    }
}
