const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 100;

/// LIMIT/OFFSET window of a list request. Pages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub per_page: u64,
    pub offset: u64,
}

impl PageWindow {
    /// Clamps the requested page size to 1..=100. Huge page numbers saturate
    /// the offset instead of overflowing; such a page is simply empty.
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);

        Self {
            page,
            per_page,
            offset: (page - 1).saturating_mul(per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_twenty() {
        assert_eq!(
            PageWindow::new(None, None),
            PageWindow {
                page: 1,
                per_page: 20,
                offset: 0
            }
        );
    }

    #[test]
    fn clamps_page_size_and_zero_page() {
        let window = PageWindow::new(Some(0), Some(1000));
        assert_eq!(window.page, 1);
        assert_eq!(window.per_page, 100);
        assert_eq!(PageWindow::new(Some(3), Some(0)).offset, 2);
        assert_eq!(PageWindow::new(Some(3), Some(25)).offset, 50);
    }

    #[test]
    fn huge_page_saturates_offset() {
        let window = PageWindow::new(Some(u64::MAX), Some(20));
        assert_eq!(window.page, u64::MAX);
        assert_eq!(window.offset, u64::MAX);

        let window = PageWindow::new(Some(u64::from(u32::MAX)), Some(20));
        assert_eq!(window.offset, (u64::from(u32::MAX) - 1) * 20);
    }
}
