pub const PAGE_LENGTH: usize = 5;

/// 1-based page number. Anything below 1 is treated as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(usize);

impl Page {
    pub fn new(page: i64) -> Self {
        Self(usize::try_from(page).unwrap_or(0).max(1))
    }

    pub fn number(self) -> usize {
        self.0
    }
}

impl Default for Page {
    fn default() -> Self {
        Self(1)
    }
}

/// Returns `items[(page - 1) * size .. page * size]`, or nothing past the end.
pub fn paginate<T>(items: Vec<T>, page: Page, size: usize) -> Vec<T> {
    let skip = (page.0 - 1).saturating_mul(size);
    items.into_iter().skip(skip).take(size).collect()
}
