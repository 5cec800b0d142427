/// Pagination support for queries
///
/// Standard pagination model used across all bounded contexts
use serde::{Deserialize, Serialize};

/// Pagination metadata reported alongside a page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub has_next_page: bool,
    pub last_page: Option<u32>,
    pub total: Option<u64>,
    pub per_page: Option<u32>,
}

impl PageInfo {
    /// Metadata for a single page with nothing after it
    pub fn single(current_page: u32, count: usize) -> Self {
        Self {
            current_page,
            has_next_page: false,
            last_page: Some(current_page),
            total: Some(count as u64),
            per_page: Some(count as u32),
        }
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next_page.then(|| self.current_page + 1)
    }
}

/// Paginated result wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    /// Empty page used when a read degrades instead of failing
    pub fn empty(page: u32) -> Self {
        Self {
            items: Vec::new(),
            page_info: PageInfo {
                current_page: page,
                has_next_page: false,
                last_page: None,
                total: Some(0),
                per_page: None,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
