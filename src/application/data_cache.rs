// Local data cache - persisted mock datasets and their metadata
use crate::application::data_provider::DataProvider;
use crate::application::key_value_store::{KeyValueStore, StorageError};
use crate::domain::parameter::catalog;
use crate::domain::telemetry::{DataFile, StoreMetadata};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub const METADATA_KEY: &str = "ningaloo-research-data";

pub fn data_key(parameter: &str) -> String {
    format!("ningaloo-{}-data", parameter)
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to serialize {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Provider failed for {parameter}: {reason}")]
    Provider { parameter: String, reason: String },
}

/// What the shell needs to show on startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatus {
    pub last_update: Option<DateTime<Utc>>,
    pub missing_files: usize,
}

#[derive(Clone)]
pub struct LocalDataCache {
    store: Arc<dyn KeyValueStore>,
    provider: Arc<dyn DataProvider>,
    latency: Duration,
}

impl LocalDataCache {
    pub fn new(store: Arc<dyn KeyValueStore>, provider: Arc<dyn DataProvider>, latency: Duration) -> Self {
        Self {
            store,
            provider,
            latency,
        }
    }

    pub fn init(&self) -> CacheStatus {
        let status = CacheStatus {
            last_update: self.load_metadata().map(|m| m.last_update),
            missing_files: self.check_missing(),
        };
        tracing::info!(
            last_update = ?status.last_update,
            missing_files = status.missing_files,
            "Local data cache loaded"
        );
        status
    }

    pub fn load_metadata(&self) -> Option<StoreMetadata> {
        self.read_record(METADATA_KEY)
    }

    pub fn load_data_file(&self, parameter: &str) -> Option<DataFile> {
        self.read_record(&data_key(parameter))
    }

    /// Number of known parameters (0..=4) without a readable dataset
    pub fn check_missing(&self) -> usize {
        catalog()
            .iter()
            .filter(|p| self.load_data_file(p.id).is_none())
            .count()
    }

    /// Regenerates and overwrites every dataset, then the metadata record.
    ///
    /// Not transactional: on failure, datasets written before the failing one
    /// stay overwritten and the metadata record is left as it was. Callers
    /// must not run two refreshes at once.
    pub async fn refresh(&self) -> Result<StoreMetadata, CacheError> {
        tokio::time::sleep(self.latency).await;

        let mut files_count = 0;
        let mut total_size = 0;

        for parameter in catalog() {
            let file = self
                .provider
                .fetch_dataset(parameter.id)
                .await
                .map_err(|e| CacheError::Provider {
                    parameter: parameter.id.to_string(),
                    reason: format!("{:#}", e),
                })?;

            let key = data_key(parameter.id);
            let json = serde_json::to_string(&file).map_err(|source| CacheError::Serialization {
                key: key.clone(),
                source,
            })?;
            self.store.set(&key, &json)?;

            tracing::debug!(key = %key, bytes = json.len(), "Stored dataset");
            files_count += 1;
            total_size += json.len();
        }

        let metadata = StoreMetadata {
            last_update: Utc::now(),
            files_count,
            total_size,
        };
        let json = serde_json::to_string(&metadata).map_err(|source| CacheError::Serialization {
            key: METADATA_KEY.to_string(),
            source,
        })?;
        self.store.set(METADATA_KEY, &json)?;

        tracing::info!(files_count, total_size, "Research data updated");
        Ok(metadata)
    }

    /// Removes every dataset and the metadata record.
    /// Returns how many of them were present.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let keys = catalog()
            .iter()
            .map(|p| data_key(p.id))
            .chain(std::iter::once(METADATA_KEY.to_string()));

        let mut removed = 0;
        for key in keys {
            if self.store.contains(&key)? {
                self.store.remove(&key)?;
                removed += 1;
            }
        }

        tracing::info!(removed, "Local data cache cleared");
        Ok(removed)
    }

    /// Unreadable or malformed records count as absent
    fn read_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored record");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed stored record");
                None
            }
        }
    }
}
