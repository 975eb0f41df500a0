// Provider trait for measurement data access
use crate::domain::telemetry::{DataFile, DataPoint};
use crate::domain::timeline::TimeRange;
use async_trait::async_trait;

#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Spatial samples for one parameter inside the given window (for map panels)
    async fn sample_points(
        &self,
        parameter: &str,
        range: &TimeRange,
        count: usize,
    ) -> anyhow::Result<Vec<DataPoint>>;

    /// Full dataset for one parameter (for the local cache)
    async fn fetch_dataset(&self, parameter: &str) -> anyhow::Result<DataFile>;
}
