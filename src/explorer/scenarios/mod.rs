//! Named filter and weight combinations: built-ins, user scenarios and the
//! auto-saved live state, persisted as one JSON envelope.

pub mod builtin;
pub mod domain;
mod envelope;
mod migration;
pub mod storage;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    LiveState, PersistedState, Scenario, ScenarioDraft, ScenarioFilters, ScenarioId, ScenarioKind,
    ScenarioPatch, LIVE_SCENARIO_ID, LIVE_SCENARIO_LABEL, RESET_SCENARIO_ID,
};
pub use migration::MigrationReport;
pub use storage::{
    ConfiguredStore, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError,
};
pub use store::{
    ScenarioStore, ScenarioStoreError, SharedScenario, DEFAULT_LEGACY_KEY, DEFAULT_STATE_KEY,
};
