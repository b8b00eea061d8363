// ==========================================
// Depot Management - Depot repository contract
// ==========================================
// One contract, three drivers (mapped / templated / raw)
// Rule: every read skips IsDeleted = 1 rows
// ==========================================

use crate::domain::{ArticleSet, Depot, FilterOptions};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// Result of an update or soft delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Updated,
    /// No non-deleted row with that id
    NotFound,
}

impl MutationOutcome {
    pub fn from_rows_affected(rows: usize) -> Self {
        if rows > 0 {
            MutationOutcome::Updated
        } else {
            MutationOutcome::NotFound
        }
    }

    pub fn is_updated(self) -> bool {
        self == MutationOutcome::Updated
    }
}

// ==========================================
// DepotRepository - persistence contract
// ==========================================
#[async_trait]
pub trait DepotRepository: Send + Sync {
    /// Insert a depot
    ///
    /// Stamps `created_at` with the current UTC time, clears `is_deleted`
    /// and defaults `active` to true. Returns the stored depot with its id.
    async fn add(&self, depot: Depot) -> RepositoryResult<Depot>;

    /// All non-deleted depots, newest id first
    async fn get_all(&self) -> RepositoryResult<Vec<Depot>>;

    /// The non-deleted depot with `id`, if any
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Depot>>;

    /// Overwrite `active` and `name` of a non-deleted depot
    ///
    /// `created_at`, `created_by` and `is_deleted` are never written.
    async fn update(&self, depot: &Depot) -> RepositoryResult<MutationOutcome>;

    /// Soft delete: flag the row, never remove it
    async fn delete(&self, id: i64) -> RepositoryResult<MutationOutcome>;

    /// Filtered, sorted, paged listing plus the pre-paging count
    async fn list(&self, options: &FilterOptions) -> RepositoryResult<ArticleSet<Depot>>;

    /// Short driver name, used in logs
    fn driver_name(&self) -> &'static str;
}

// ==========================================
// DepotRepositoryExt - list helpers for any parent type
// ==========================================
#[async_trait]
pub trait DepotRepositoryExt: DepotRepository {
    /// List with options carrying any parent identifier (ignored for depots)
    async fn list_by<P>(&self, options: &FilterOptions<P>) -> RepositoryResult<ArticleSet<Depot>>
    where
        P: Send + Sync,
    {
        self.list(&options.without_parent()).await
    }

    /// Positional form of `list_by`
    #[allow(clippy::too_many_arguments)]
    async fn get_articles<P>(
        &self,
        page_index: u32,
        page_size: u32,
        search_field: &str,
        search_query: &str,
        sort_order: &str,
        parent_identifier: P,
    ) -> RepositoryResult<ArticleSet<Depot>>
    where
        P: Send + Sync,
    {
        let options = FilterOptions::page(page_index, page_size)
            .with_search(search_field, search_query)
            .with_sort(sort_order)
            .with_parent(parent_identifier);
        self.list_by(&options).await
    }
}

impl<T: DepotRepository + ?Sized> DepotRepositoryExt for T {}
