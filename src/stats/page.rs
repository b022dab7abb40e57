//! Page selection over the ordered bucket sequence
//!
//! A chart shows a fixed number of x-axis slots at once. Pages are contiguous
//! slices of the full sequence; concatenating every page reproduces it.

use serde::Serialize;

/// Position of the visible page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Zero-based page index
    pub index: usize,
    /// Always at least 1, even for an empty sequence
    pub total_pages: usize,
}

/// A selected window of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

/// Number of pages needed for `len` items, at least 1
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Select the page at `page_index`, clamping it into range
///
/// An index past the end is pulled back to the last page; a page that would
/// still come out empty steps back one page at a time, stopping at page 0.
pub fn select_page<T: Clone>(items: &[T], page_size: usize, page_index: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = total_pages(items.len(), page_size);
    let mut index = page_index.min(total - 1);

    while index > 0 && index * page_size >= items.len() {
        index -= 1;
    }

    let start = (index * page_size).min(items.len());
    let end = ((index + 1) * page_size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        info: PageInfo {
            index,
            total_pages: total,
        },
    }
}

/// Page index state with boundary-respecting navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    index: usize,
    total_pages: usize,
}

impl Paginator {
    /// Start at page 0 for `len` items
    pub fn new(len: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            index: 0,
            total_pages: total_pages(len, page_size),
        }
    }

    /// Adopt a new sequence length and page size, clamping the current index
    pub fn resize(&mut self, len: usize, page_size: usize) {
        self.page_size = page_size.max(1);
        self.total_pages = total_pages(len, self.page_size);
        self.index = self.index.min(self.total_pages - 1);
    }

    /// Jump back to the first page
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Go to a page, clamped to the last one
    pub fn go_to(&mut self, index: usize) {
        self.index = index.min(self.total_pages - 1);
    }

    /// Advance one page; returns false when already on the last page
    pub fn next(&mut self) -> bool {
        if self.index < self.total_pages.saturating_sub(1) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Step back one page; returns false when already on the first page
    pub fn previous(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            index: self.index,
            total_pages: self.total_pages,
        }
    }

    /// Select the current page from `items`
    pub fn select<T: Clone>(&self, items: &[T]) -> Page<T> {
        select_page(items, self.page_size, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(31, 11), 3);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn test_select_last_partial_page() {
        let items: Vec<u32> = (1..=31).collect();
        let page = select_page(&items, 11, 2);
        assert_eq!(page.items, (23..=31).collect::<Vec<_>>());
        assert_eq!(page.info, PageInfo { index: 2, total_pages: 3 });
    }

    #[test]
    fn test_select_clamps_index() {
        let items: Vec<u32> = (1..=7).collect();
        let page = select_page(&items, 5, 9);
        assert_eq!(page.info.index, 1);
        assert_eq!(page.items, vec![6, 7]);
    }

    #[test]
    fn test_select_empty_sequence() {
        let items: Vec<u32> = Vec::new();
        let page = select_page(&items, 5, 3);
        assert!(page.items.is_empty());
        assert_eq!(page.info, PageInfo { index: 0, total_pages: 1 });
    }

    #[test]
    fn test_pages_reproduce_sequence() {
        let items: Vec<u32> = (0..23).collect();
        for size in 1..=12 {
            let pages = total_pages(items.len(), size);
            let joined: Vec<u32> = (0..pages)
                .flat_map(|i| select_page(&items, size, i).items)
                .collect();
            assert_eq!(joined, items, "page size {}", size);
        }
    }

    #[test]
    fn test_paginator_boundaries() {
        let mut pager = Paginator::new(12, 5);
        assert!(!pager.previous());
        assert_eq!(pager.info(), PageInfo { index: 0, total_pages: 3 });

        assert!(pager.next());
        assert!(pager.next());
        let last = pager.info();
        assert!(!pager.next());
        assert_eq!(pager.info(), last);
        assert_eq!(last.index, 2);
    }

    #[test]
    fn test_paginator_resize_clamps() {
        let mut pager = Paginator::new(30, 10);
        pager.go_to(2);
        pager.resize(12, 10);
        assert_eq!(pager.index(), 1);

        pager.resize(0, 10);
        assert_eq!(pager.info(), PageInfo { index: 0, total_pages: 1 });
    }
}
