//! Record store contract: filter/page/patch types shared by the
//! recording and document tables.

use chrono::{DateTime, Utc};
use clinrag_core::IngestStatus;
use serde::{Deserialize, Serialize};

/// Query filter for `List`. All fields are optional and conjunctive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    pub status: Option<IngestStatus>,
    pub patient: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Pagination request. `page` is 1-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, size: 20 }
    }
}

impl Page {
    pub fn offset(&self) -> i64 {
        ((self.page.saturating_sub(1)) as i64) * self.size as i64
    }

    pub fn limit(&self) -> i64 {
        self.size as i64
    }
}

/// A page of results, ordered `created_at desc, id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_is_zero_based() {
        let p = Page { page: 1, size: 20 };
        assert_eq!(p.offset(), 0);
        let p2 = Page { page: 3, size: 20 };
        assert_eq!(p2.offset(), 40);
    }
}
