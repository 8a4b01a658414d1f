//! Fixed-size pagination of ordered listings.

use std::num::IntErrorKind;

use serde::Serialize;

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// A page number as requested by the client, before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Absent or not an integer: the first page.
    First,
    Number(i64),
}

impl PageRequest {
    /// Parse the raw `page` query parameter.
    ///
    /// Integers beyond `i64` saturate so they still clamp like any other
    /// out-of-range number.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return PageRequest::First;
        };
        match raw.parse::<i64>() {
            Ok(n) => PageRequest::Number(n),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => PageRequest::Number(i64::MAX),
                IntErrorKind::NegOverflow => PageRequest::Number(i64::MIN),
                _ => PageRequest::First,
            },
        }
    }
}

/// Pagination metadata for one resolved page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// 1-based page number; 1 even when there are no pages.
    pub number: u64,
    pub num_pages: u64,
    /// Total number of items across all pages.
    pub count: u64,
    pub per_page: u64,
}

impl PageMeta {
    /// Number of items to skip to reach this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }
}

/// One page of items plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Resolves untrusted page numbers against a known item count.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

impl Paginator {
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn num_pages(&self, count: u64) -> u64 {
        count.div_ceil(self.per_page)
    }

    /// Resolve `request` into a concrete page.
    ///
    /// Out-of-range numbers (above the last page, or below 1) fall back to
    /// the last page. An empty listing is page 1 of 0.
    pub fn page_meta(&self, count: u64, request: PageRequest) -> PageMeta {
        let num_pages = self.num_pages(count);
        let number = match request {
            _ if num_pages == 0 => 1,
            PageRequest::First => 1,
            PageRequest::Number(n) if n < 1 => num_pages,
            PageRequest::Number(n) => (n as u64).min(num_pages),
        };

        PageMeta {
            number,
            num_pages,
            count,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice<T>(paginator: &Paginator, items: Vec<T>, request: PageRequest) -> Page<T> {
        let meta = paginator.page_meta(items.len() as u64, request);
        let items = items
            .into_iter()
            .skip(meta.offset() as usize)
            .take(meta.per_page as usize)
            .collect();
        Page { items, meta }
    }

    fn sizes(paginator: &Paginator, total: usize) -> Vec<usize> {
        let items: Vec<usize> = (0..total).collect();
        (1..=paginator.num_pages(total as u64))
            .map(|n| {
                slice(paginator, items.clone(), PageRequest::Number(n as i64))
                    .items
                    .len()
            })
            .collect()
    }

    #[test]
    fn test_parse_page_request() {
        assert_eq!(PageRequest::parse(None), PageRequest::First);
        assert_eq!(PageRequest::parse(Some("abc")), PageRequest::First);
        assert_eq!(PageRequest::parse(Some("2.5")), PageRequest::First);
        assert_eq!(PageRequest::parse(Some("")), PageRequest::First);
        assert_eq!(PageRequest::parse(Some("3")), PageRequest::Number(3));
        assert_eq!(PageRequest::parse(Some("-1")), PageRequest::Number(-1));
        assert_eq!(
            PageRequest::parse(Some("99999999999999999999")),
            PageRequest::Number(i64::MAX)
        );
    }

    #[test]
    fn test_twenty_five_items_make_three_pages() {
        let paginator = Paginator::default();
        assert_eq!(sizes(&paginator, 25), vec![10, 10, 5]);
    }

    #[test]
    fn test_third_page_holds_the_tail() {
        let paginator = Paginator::default();
        let items: Vec<u32> = (0..25).collect();

        let page = slice(&paginator, items, PageRequest::parse(Some("3")));

        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert!(!page.meta.has_next());
        assert_eq!(page.meta.previous_page_number(), Some(2));
    }

    #[test]
    fn test_out_of_range_clamps_to_last_page() {
        let paginator = Paginator::default();
        let items: Vec<u32> = (0..25).collect();

        let page = slice(&paginator, items.clone(), PageRequest::parse(Some("99")));
        assert_eq!(page.meta.number, 3);
        assert_eq!(page.items.len(), 5);

        let page = slice(&paginator, items.clone(), PageRequest::parse(Some("0")));
        assert_eq!(page.meta.number, 3);

        let page = slice(
            &paginator,
            items.clone(),
            PageRequest::parse(Some("99999999999999999999")),
        );
        assert_eq!(page.meta.number, 3);
        assert_eq!(page.items.len(), 5);

        let page = slice(&paginator, items, PageRequest::parse(Some("-99999999999999999999")));
        assert_eq!(page.meta.number, 3);
    }

    #[test]
    fn test_invalid_input_is_first_page() {
        let paginator = Paginator::default();
        let items: Vec<u32> = (0..25).collect();

        let page = slice(&paginator, items, PageRequest::parse(Some("last-ish")));

        assert_eq!(page.meta.number, 1);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.meta.next_page_number(), Some(2));
        assert!(!page.meta.has_previous());
    }

    #[test]
    fn test_empty_listing_is_page_one_of_zero() {
        let paginator = Paginator::default();

        let page = slice(&paginator, Vec::<u32>::new(), PageRequest::Number(4));

        assert!(page.items.is_empty());
        assert_eq!(page.meta.number, 1);
        assert_eq!(page.meta.num_pages, 0);
        assert_eq!(page.meta.offset(), 0);
        assert!(!page.meta.has_next());
        assert!(!page.meta.has_previous());
    }
}
