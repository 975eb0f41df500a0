// Mock data provider - random placeholder measurements around Ningaloo Reef
use crate::application::data_provider::DataProvider;
use crate::domain::telemetry::{DataFile, DataPoint, Quality};
use crate::domain::timeline::TimeRange;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

pub const REEF_CENTER_LAT: f64 = -22.3;
pub const REEF_CENTER_LNG: f64 = 113.8;
const JITTER_DEGREES: f64 = 1.0;
const DAY_MS: f64 = 86_400_000.0;

pub const DATASET_DAYS: i64 = 30;
pub const DATASET_HOURS: i64 = 24;
pub const DATASET_SAMPLES_PER_HOUR: usize = 10;
const GOOD_QUALITY_PROBABILITY: f64 = 0.9;

/// Daily-period sine of the wall clock, in [-1, 1]
pub fn seasonal_term(now: DateTime<Utc>) -> f64 {
    (now.timestamp_millis() as f64 / DAY_MS).sin()
}

/// Plausible value for a parameter at `now`. Unknown parameters get 0..100.
pub fn value_for<R: Rng + ?Sized>(parameter: &str, now: DateTime<Utc>, rng: &mut R) -> f64 {
    let seasonal = seasonal_term(now);
    match parameter {
        "sst" => rng.gen_range(18.0..30.0) + 3.0 * seasonal,
        "chlorophyll" => rng.gen_range(0.0..5.0) * (1.0 + 0.5 * seasonal),
        "salinity" => rng.gen_range(34.0..36.0) + 0.5 * seasonal,
        // Depth does not vary with time
        "bathymetry" => -rng.gen_range(0.0..200.0),
        _ => rng.gen_range(0.0..100.0),
    }
}

fn jittered_position<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    (
        REEF_CENTER_LAT + rng.gen_range(-JITTER_DEGREES..JITTER_DEGREES),
        REEF_CENTER_LNG + rng.gen_range(-JITTER_DEGREES..JITTER_DEGREES),
    )
}

/// `count` points with timestamps drawn uniformly from `range`.
pub fn sample_points<R: Rng + ?Sized>(
    parameter: &str,
    range: &TimeRange,
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<DataPoint> {
    let span_ms = (range.end - range.start).num_milliseconds().max(0);

    (0..count)
        .map(|_| {
            let (lat, lng) = jittered_position(rng);
            let offset = TimeDelta::milliseconds(rng.gen_range(0..=span_ms));
            DataPoint::new(lat, lng, value_for(parameter, now, rng), range.start + offset)
        })
        .collect()
}

/// Hourly samples for the 30 days before `now`.
pub fn dataset<R: Rng + ?Sized>(parameter: &str, now: DateTime<Utc>, rng: &mut R) -> DataFile {
    let capacity = (DATASET_DAYS * DATASET_HOURS) as usize * DATASET_SAMPLES_PER_HOUR;
    let mut points = Vec::with_capacity(capacity);

    for day in 0..DATASET_DAYS {
        for hour in 0..DATASET_HOURS {
            let timestamp = now - TimeDelta::days(day) - TimeDelta::hours(hour);
            for _ in 0..DATASET_SAMPLES_PER_HOUR {
                let (lat, lng) = jittered_position(rng);
                let quality = if rng.gen_bool(GOOD_QUALITY_PROBABILITY) {
                    Quality::Good
                } else {
                    Quality::Questionable
                };
                points.push(
                    DataPoint::new(lat, lng, value_for(parameter, now, rng), timestamp)
                        .with_quality(quality),
                );
            }
        }
    }

    DataFile::new(parameter.to_string(), now, points)
}

#[derive(Debug)]
pub struct MockDataProvider {
    rng: Mutex<StdRng>,
}

impl MockDataProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *rng)
    }
}

impl Default for MockDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataProvider for MockDataProvider {
    async fn sample_points(
        &self,
        parameter: &str,
        range: &TimeRange,
        count: usize,
    ) -> Result<Vec<DataPoint>> {
        let now = Utc::now();
        Ok(self.with_rng(|rng| sample_points(parameter, range, count, now, rng)))
    }

    async fn fetch_dataset(&self, parameter: &str) -> Result<DataFile> {
        let now = Utc::now();
        let file = self.with_rng(|rng| dataset(parameter, now, rng));
        tracing::debug!("Generated {} mock points for {}", file.count, parameter);
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timeline::{Granularity, Timeline};
    use chrono::TimeZone;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_value_ranges() {
        let mut rng = seeded();
        let now = Utc.with_ymd_and_hms(2025, 8, 3, 0, 0, 0).unwrap();
        let s = seasonal_term(now);

        for _ in 0..500 {
            let sst = value_for("sst", now, &mut rng);
            assert!(sst >= 18.0 + 3.0 * s && sst <= 30.0 + 3.0 * s);

            let chl = value_for("chlorophyll", now, &mut rng);
            assert!(chl >= 0.0 && chl <= 5.0 * (1.0 + 0.5 * s));

            let sal = value_for("salinity", now, &mut rng);
            assert!(sal >= 34.0 + 0.5 * s && sal <= 36.0 + 0.5 * s);

            let depth = value_for("bathymetry", now, &mut rng);
            assert!(depth <= 0.0 && depth > -200.0);

            let other = value_for("turbidity", now, &mut rng);
            assert!((0.0..100.0).contains(&other));
        }
    }

    #[test]
    fn test_sample_points_inside_range_and_reef_box() {
        let mut rng = seeded();
        let mut timeline = Timeline::new();
        timeline.scrub(40);
        timeline.set_granularity(Granularity::Hours);
        let range = timeline.time_range();

        let points = sample_points("salinity", &range, 20, Utc::now(), &mut rng);
        assert_eq!(points.len(), 20);
        for p in &points {
            assert!(range.contains(p.timestamp));
            assert!((p.lat - REEF_CENTER_LAT).abs() <= 1.0);
            assert!((p.lng - REEF_CENTER_LNG).abs() <= 1.0);
            assert!(p.quality.is_none());
        }
    }

    #[test]
    fn test_sample_points_zero_width_range() {
        let mut rng = seeded();
        let at = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let range = TimeRange {
            start: at,
            end: at,
            granularity: Granularity::Hours,
        };
        let points = sample_points("sst", &range, 3, at, &mut rng);
        assert!(points.iter().all(|p| p.timestamp == at));
    }

    #[test]
    fn test_dataset_shape() {
        let mut rng = seeded();
        let now = Utc.with_ymd_and_hms(2025, 8, 10, 12, 0, 0).unwrap();
        let file = dataset("chlorophyll", now, &mut rng);

        assert_eq!(file.count, 7200);
        assert_eq!(file.data.len(), 7200);
        assert_eq!(file.parameter, "chlorophyll");
        assert_eq!(file.generated_at, now);
        assert_eq!(file.data[0].timestamp, now);
        let oldest = now - TimeDelta::days(29) - TimeDelta::hours(23);
        assert_eq!(file.data[7199].timestamp, oldest);
        assert!(file.data.iter().all(|p| p.quality.is_some()));
        assert!(file.data.iter().all(|p| p.quality != Some(Quality::Bad)));
    }

    #[tokio::test]
    async fn test_provider_returns_requested_count() {
        let provider = MockDataProvider::with_seed(1);
        let range = Timeline::new().time_range();
        let points = provider.sample_points("bathymetry", &range, 20).await.unwrap();
        assert_eq!(points.len(), 20);
        assert!(points.iter().all(|p| p.value <= 0.0));
    }
}
