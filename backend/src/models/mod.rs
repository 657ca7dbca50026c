pub mod mood_log;
pub mod plant;
pub mod reminder;
pub mod user;

use serde::{Deserialize, Serialize};

/// `?page=N`, 1-based.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn number(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// `(offset, limit)` for this page.
    pub fn window(&self, per_page: i64) -> (i64, i64) {
        let offset = (self.number() - 1).saturating_mul(per_page);
        (offset, per_page)
    }
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}
