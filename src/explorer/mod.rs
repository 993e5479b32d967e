//! Scoring and scenario engine for narrowing and ranking a vehicle catalog.

pub mod attributes;
pub mod catalog;
pub mod domain;
pub mod filters;
pub mod scenarios;
pub mod scoring;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use attributes::{AttributeBounds, AttributeSpec};
pub use catalog::{Catalog, CatalogError};
pub use domain::{BodyType, Powertrain, SizeClass, Vehicle, VehicleId};
pub use filters::{
    fuzzy_match, get_filter_reasons, vehicle_passes_filters, FilterConfig, FilterReason,
    RangeFilter,
};
pub use scenarios::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, Scenario, ScenarioId, ScenarioKind,
    ScenarioStore, ScenarioStoreError,
};
pub use scoring::{calculate_score, compute_data_ranges, DataRanges, ScoringEngine, WeightVector};
pub use session::{ActiveConfiguration, ExplorerResults, ExplorerSession, SessionError};
