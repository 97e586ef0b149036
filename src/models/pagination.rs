use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sanitized page/limit pair with the derived SQL offset.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + pagination.limit - 1) / pagination.limit
        };

        Self {
            items,
            total,
            page: pagination.page,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_five_items_at_twenty_per_page() {
        let p = Pagination::new(Some(3), Some(20));
        assert_eq!(p.offset(), 40);

        let page = Page::new(vec![0u8; 5], 45, p);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 5);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn earlier_pages_have_next() {
        for n in 1..=2 {
            let page = Page::new(vec![0u8; 20], 45, Pagination::new(Some(n), Some(20)));
            assert!(page.has_next, "page {} should have next", n);
        }
    }

    #[test]
    fn defaults_and_clamping() {
        let p = Pagination::new(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, DEFAULT_PAGE_SIZE);

        let p = Pagination::new(Some(0), Some(10_000));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, MAX_PAGE_SIZE);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page = Page::new(Vec::<u8>::new(), 0, Pagination::new(Some(1), Some(20)));
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }
}
