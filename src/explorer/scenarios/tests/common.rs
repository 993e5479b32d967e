use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::explorer::attributes;
use crate::explorer::scenarios::domain::{ScenarioDraft, ScenarioFilters, ScenarioId};
use crate::explorer::scenarios::storage::{KeyValueStore, MemoryKeyValueStore, StorageError};
use crate::explorer::scenarios::store::ScenarioStore;
use crate::explorer::scoring::{compute_data_ranges, DataRanges, WeightVector};
use crate::explorer::testing::sample_catalog;

pub(super) fn build_store() -> (ScenarioStore<MemoryKeyValueStore>, Arc<MemoryKeyValueStore>) {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = ScenarioStore::new(backend.clone());
    (store, backend)
}

pub(super) fn sample_ranges() -> DataRanges {
    compute_data_ranges(&sample_catalog(), attributes::all())
}

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn draft(label: &str) -> ScenarioDraft {
    ScenarioDraft {
        label: label.to_string(),
        description: format!("{label} description"),
        filters: ScenarioFilters {
            min_towing: Some(5_000.0),
            ..ScenarioFilters::default()
        },
        weights: WeightVector::from_pairs([("towing", 5), ("reliability", 4)]),
        based_on: None,
    }
}

pub(super) fn id(value: &str) -> ScenarioId {
    ScenarioId::new(value)
}

/// Reads succeed with whatever was seeded; every write fails.
pub(super) struct ReadOnlyBackend {
    pub(super) seeded: Option<String>,
}

impl KeyValueStore for ReadOnlyBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.seeded.clone())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read only".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read only".to_string()))
    }
}

/// Every read fails.
pub(super) struct BrokenBackend;

impl KeyValueStore for BrokenBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disk on fire".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Memory-backed store whose removals always fail.
#[derive(Default)]
pub(super) struct UndeletableBackend {
    pub(super) inner: MemoryKeyValueStore,
}

impl KeyValueStore for UndeletableBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("permission denied".to_string()))
    }
}
