// Telemetry data domain models
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Good,
    Questionable,
    /// Accepted on the wire; the mock generator never emits it.
    #[allow(dead_code)]
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub lat: f64,
    pub lng: f64,
    pub value: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
}

impl DataPoint {
    pub fn new(lat: f64, lng: f64, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            lat,
            lng,
            value,
            timestamp,
            quality: None,
        }
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }
}

/// One cached dataset; overwritten wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    pub parameter: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    pub data: Vec<DataPoint>,
}

impl DataFile {
    pub fn new(parameter: String, generated_at: DateTime<Utc>, data: Vec<DataPoint>) -> Self {
        Self {
            parameter,
            generated_at,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMetadata {
    pub last_update: DateTime<Utc>,
    pub files_count: usize,
    /// Byte length of the serialized files
    pub total_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_data_file_wire_names() {
        let at = Utc.with_ymd_and_hms(2025, 8, 2, 3, 0, 0).unwrap();
        let file = DataFile::new(
            "sst".to_string(),
            at,
            vec![DataPoint::new(-22.3, 113.8, 24.5, at).with_quality(Quality::Good)],
        );

        let json: serde_json::Value = serde_json::to_value(&file).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["generatedAt"], at.timestamp_millis());
        assert_eq!(json["data"][0]["quality"], "good");
        assert_eq!(json["data"][0]["timestamp"], at.timestamp_millis());
    }

    #[test]
    fn test_quality_omitted_when_absent() {
        let at = Utc.with_ymd_and_hms(2025, 8, 2, 3, 0, 0).unwrap();
        let json = serde_json::to_string(&DataPoint::new(0.0, 0.0, 1.0, at)).unwrap();
        assert!(!json.contains("quality"));
    }

    #[test]
    fn test_quality_parses_every_wire_value() {
        let parsed: Vec<Quality> = serde_json::from_str(r#"["good","questionable","bad"]"#).unwrap();
        assert_eq!(parsed, vec![Quality::Good, Quality::Questionable, Quality::Bad]);

        let point: DataPoint =
            serde_json::from_str(r#"{"lat":-22.0,"lng":113.5,"value":3.0,"timestamp":0,"quality":"bad"}"#)
                .unwrap();
        assert_eq!(point.quality, Some(Quality::Bad));
        assert!(serde_json::from_str::<Quality>(r#""unknown""#).is_err());
    }

    #[test]
    fn test_metadata_wire_names() {
        let metadata = StoreMetadata {
            last_update: Utc.with_ymd_and_hms(2025, 8, 2, 3, 0, 0).unwrap(),
            files_count: 4,
            total_size: 1024,
        };
        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("\"lastUpdate\":\"2025-08-02T03:00:00Z\""));
        assert!(json.contains("\"filesCount\":4"));
        assert!(json.contains("\"totalSize\":1024"));
    }
}
