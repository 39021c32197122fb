//! Page-number pagination over an ordered collection.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

/// Client-supplied paging parameters; absent values take defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl PageRequest {
    pub fn per_page(&self) -> u64 {
        match self.limit {
            Some(0) | None => DEFAULT_PER_PAGE,
            Some(n) => n.min(MAX_PER_PAGE),
        }
    }

    /// Slice `items` to the requested page. Pages past the end clamp to the last one.
    pub fn apply<T>(&self, items: Vec<T>) -> Page<T> {
        let per_page = self.per_page();
        let total_count = items.len() as u64;
        let total_pages = total_count.div_ceil(per_page).max(1);
        let current_page = self.page.unwrap_or(1).clamp(1, total_pages);

        let skip = usize::try_from((current_page - 1) * per_page).unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(usize::MAX);
        let items = items.into_iter().skip(skip).take(take).collect();

        Page {
            items,
            meta: PageMeta {
                current_page,
                total_pages,
                total_count,
                per_page,
            },
        }
    }
}
