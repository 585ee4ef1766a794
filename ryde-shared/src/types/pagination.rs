use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 { 1 }
fn default_limit() -> u64 { 10 }

impl PaginationParams {
    /// Rows to skip. Saturates and stays within `i64`, so the value can
    /// bind directly as a SQL OFFSET whatever the client sends.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit())
            .min(i64::MAX as u64)
    }

    /// Page size, floored to 1 so the window and `totalPages` stay
    /// defined, and capped to the SQL LIMIT range.
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, i64::MAX as u64)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Pagination metadata returned next to paginated `data`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(total: u64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            total,
            page: params.page,
            limit,
            total_pages,
        }
    }
}
