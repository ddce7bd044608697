use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page position shown under list views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// 1-based.
    pub current_page: usize,
    /// Always at least 1, even for an empty list.
    pub total_pages: usize,
    pub limit: usize,
}

impl PaginationConfig {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Client-side pagination over a list that was fetched in full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self { page_size: page_size.max(1) }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }

    /// Clamp a requested page into `1..=total_pages`.
    pub fn clamp(&self, page: usize, total_items: usize) -> usize {
        page.clamp(1, self.total_pages(total_items))
    }

    pub fn config(&self, page: usize, total_items: usize) -> PaginationConfig {
        PaginationConfig {
            current_page: self.clamp(page, total_items),
            total_pages: self.total_pages(total_items),
            limit: self.page_size,
        }
    }

    /// Items on `page` after clamping.
    pub fn page<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let page = self.clamp(page, items.len());
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());
        &items[start.min(items.len())..end]
    }
}
