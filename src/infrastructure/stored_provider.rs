// Stored data provider - serves panel samples out of cached datasets
use crate::application::data_cache::data_key;
use crate::application::data_provider::DataProvider;
use crate::application::key_value_store::KeyValueStore;
use crate::domain::telemetry::{DataFile, DataPoint};
use crate::domain::timeline::{fixed_end, TimeRange};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

/// Where the newest cached sample lands on the fixed week: the middle of its
/// final hour, so every hour-wide window holds one hourly sample slot.
fn anchor() -> DateTime<Utc> {
    fixed_end() - TimeDelta::minutes(30)
}

/// Moves every sample by the same offset so `generated_at` lands on `anchor()`.
/// Cached datasets are stamped relative to when they were generated, while
/// panels only ever look at the fixed week.
fn replay_on_fixed_week(file: DataFile) -> Vec<DataPoint> {
    let shift = anchor() - file.generated_at;
    file.data
        .into_iter()
        .map(|mut point| {
            point.timestamp += shift;
            point
        })
        .collect()
}

/// At most `count` points, evenly strided across `points`
fn spread(points: Vec<DataPoint>, count: usize) -> Vec<DataPoint> {
    let stride = (points.len() / count.max(1)).max(1);
    points.into_iter().step_by(stride).take(count).collect()
}

#[derive(Clone)]
pub struct StoredDataProvider {
    store: Arc<dyn KeyValueStore>,
}

impl StoredDataProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read_file(&self, parameter: &str) -> Result<DataFile> {
        let key = data_key(parameter);
        let raw = self
            .store
            .get(&key)
            .with_context(|| format!("Failed to read {}", key))?
            .with_context(|| format!("No cached dataset for {}", parameter))?;

        serde_json::from_str(&raw).with_context(|| format!("Malformed dataset in {}", key))
    }
}

#[async_trait]
impl DataProvider for StoredDataProvider {
    async fn sample_points(
        &self,
        parameter: &str,
        range: &TimeRange,
        count: usize,
    ) -> Result<Vec<DataPoint>> {
        let file = self.read_file(parameter)?;
        let in_window: Vec<DataPoint> = replay_on_fixed_week(file)
            .into_iter()
            .filter(|p| range.contains(p.timestamp))
            .collect();
        let points = spread(in_window, count);

        tracing::debug!(
            "Stored provider matched {} points for {} in window",
            points.len(),
            parameter
        );
        Ok(points)
    }

    async fn fetch_dataset(&self, parameter: &str) -> Result<DataFile> {
        self.read_file(parameter)
    }
}
