use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChartSeries, DashboardStats, DateRange, PageRequest, PageResult};

/// Resource-fetch collaborator for one paginated resource.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResult<T>>;
}

/// Collaborators behind the dashboard: aggregate stats, chart series and the report export.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn stats(&self) -> Result<DashboardStats>;

    async fn chart(&self, range: DateRange) -> Result<ChartSeries>;

    async fn export(&self, range: DateRange) -> Result<Vec<u8>>;
}
