//! Query DTOs - query string parameters

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// `?page=&size=` of paginated lists, 1-based
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl PageQuery {
    /// Returns `(limit, offset)`, or `None` when the parameters are out of range
    pub fn limit_offset(&self) -> Option<(i64, i64)> {
        let page = self.page.unwrap_or(1);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 || size == 0 || size > MAX_PAGE_SIZE {
            return None;
        }
        let offset = (page as i64 - 1) * size as i64;
        Some((size as i64, offset))
    }
}
