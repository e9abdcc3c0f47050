pub mod job_listings;
pub mod messages;
pub mod payments;
pub mod portfolio;
pub mod profiles;
pub mod qualifications;
pub mod reviews;
pub mod specializations;
pub mod subscriptions;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// Page of rows plus the total across all pages.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}
