//! Page arithmetic shared by every listing.

use serde::{Deserialize, Serialize};

/// Posts per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A request for one page of an ordered sequence. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub number: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    pub fn first(size: u64) -> Self {
        Self::new(1, size)
    }

    /// Lenient parse of a `?page=` value: anything that is not a positive
    /// integer selects the first page.
    pub fn from_query(raw: Option<&str>, size: u64) -> Self {
        let number = raw
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(1);
        Self::new(number, size)
    }

    /// Resolve a page past the end to the last page.
    pub fn clamp(self, total_items: u64) -> Self {
        let last = num_pages(total_items, self.size);
        Self {
            number: self.number.min(last),
            size: self.size,
        }
    }

    /// Zero-based offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }
}

/// Number of pages for `total_items`; an empty sequence still has one page.
pub fn num_pages(total_items: u64, size: u64) -> u64 {
    total_items.div_ceil(size.max(1)).max(1)
}

/// One page of results plus the metadata needed to navigate.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            number: request.number,
            size: request.size,
            total_items,
        }
    }

    /// Slice an already ordered, fully materialized sequence.
    pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
        let total_items = all.len() as u64;
        let request = request.clamp(total_items);
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();
        Self::new(items, request, total_items)
    }

    pub fn num_pages(&self) -> u64 {
        num_pages(self.total_items, self.size)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_items: self.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_page_numbers_select_first_page() {
        assert_eq!(PageRequest::from_query(None, 10).number, 1);
        assert_eq!(PageRequest::from_query(Some("abc"), 10).number, 1);
        assert_eq!(PageRequest::from_query(Some("0"), 10).number, 1);
        assert_eq!(PageRequest::from_query(Some("-3"), 10).number, 1);
        assert_eq!(PageRequest::from_query(Some(" 4 "), 10).number, 4);
    }

    #[test]
    fn page_past_the_end_resolves_to_last() {
        let req = PageRequest::new(9, 10).clamp(25);
        assert_eq!(req.number, 3);
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn empty_sequence_has_one_page() {
        let page: Page<u32> = Page::from_vec(vec![], PageRequest::new(5, 10));
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages(), 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn from_vec_slices_in_order() {
        let page = Page::from_vec((1..=23).collect(), PageRequest::new(3, 10));
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.num_pages(), 3);
        assert!(page.has_previous());
        assert!(!page.has_next());

        let doubled = page.map(|n| n * 2);
        assert_eq!(doubled.items, vec![42, 44, 46]);
        assert_eq!(doubled.total_items, 23);
    }
}
