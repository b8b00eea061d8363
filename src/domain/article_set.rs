use serde::{Deserialize, Serialize};

/// One page of results plus the filtered total before paging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSet<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> ArticleSet<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Number of pages needed for `total_count` at the given page size
    pub fn page_count(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(page_size))
    }
}
