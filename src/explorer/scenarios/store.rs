use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::builtin;
use super::domain::{
    LiveState, PersistedState, Scenario, ScenarioDraft, ScenarioFilters, ScenarioId, ScenarioPatch,
};
use super::envelope::is_reserved;
use super::migration::{convert_legacy_presets, MigrationReport};
use super::storage::{KeyValueStore, StorageError};
use crate::explorer::scoring::{DataRanges, WeightVector};

pub const DEFAULT_STATE_KEY: &str = "vehicle-explorer.scenarios";
pub const DEFAULT_LEGACY_KEY: &str = "vehicle-explorer.presets";

const SHARE_VERSION: u32 = 1;

/// Error raised by scenario store operations.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to serialize scenario state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("scenario `{0}` not found")]
    NotFound(ScenarioId),
    #[error("scenario `{0}` is read-only")]
    ReadOnly(ScenarioId),
    #[error("scenario `{0}` is not a built-in")]
    NotBuiltIn(ScenarioId),
    #[error("scenario label must not be empty")]
    EmptyLabel,
    #[error("invalid shared scenario: {0}")]
    InvalidShare(String),
}

/// Portable representation of a scenario passed between users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedScenario {
    #[serde(default = "share_version")]
    pub version: u32,
    pub id: ScenarioId,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub filters: ScenarioFilters,
    #[serde(default)]
    pub weights: WeightVector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_at: Option<DateTime<Utc>>,
}

fn share_version() -> u32 {
    SHARE_VERSION
}

/// Built-in, user and live scenarios persisted as one envelope under a single key.
///
/// Every mutation reloads the envelope, applies a pure transform and writes it
/// back; nothing is cached between calls.
pub struct ScenarioStore<S> {
    backend: Arc<S>,
    builtins: Vec<Scenario>,
    state_key: String,
    legacy_key: String,
}

impl<S> ScenarioStore<S>
where
    S: KeyValueStore + 'static,
{
    pub fn new(backend: Arc<S>) -> Self {
        Self::with_keys(backend, DEFAULT_STATE_KEY, DEFAULT_LEGACY_KEY)
    }

    pub fn with_keys(
        backend: Arc<S>,
        state_key: impl Into<String>,
        legacy_key: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            builtins: builtin::standard(),
            state_key: state_key.into(),
            legacy_key: legacy_key.into(),
        }
    }

    pub fn builtins(&self) -> &[Scenario] {
        &self.builtins
    }

    pub fn state_key(&self) -> &str {
        &self.state_key
    }

    /// Current envelope. A missing, unreadable or malformed envelope reads as empty.
    pub fn load(&self) -> PersistedState {
        match self.backend.get(&self.state_key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(err) => {
                    warn!(
                        key = %self.state_key,
                        error = %err,
                        "discarding malformed scenario state"
                    );
                    PersistedState::default()
                }
            },
            Ok(None) => PersistedState::default(),
            Err(err) => {
                warn!(
                    key = %self.state_key,
                    error = %err,
                    "scenario state unavailable; starting fresh"
                );
                PersistedState::default()
            }
        }
    }

    pub fn save(&self, state: &PersistedState) -> Result<(), ScenarioStoreError> {
        let raw = serde_json::to_string(state)?;
        self.backend.set(&self.state_key, &raw)?;
        Ok(())
    }

    fn transact<T>(
        &self,
        mutate: impl FnOnce(PersistedState) -> Result<(PersistedState, T), ScenarioStoreError>,
    ) -> Result<T, ScenarioStoreError> {
        let (state, output) = mutate(self.load())?;
        self.save(&state)?;
        Ok(output)
    }

    pub fn visible_scenarios(&self) -> Vec<Scenario> {
        self.load().visible_scenarios(&self.builtins)
    }

    /// Built-ins currently hidden, in declaration order.
    pub fn hidden_scenarios(&self) -> Vec<Scenario> {
        let state = self.load();
        self.builtins
            .iter()
            .filter(|scenario| state.hidden.contains(&scenario.id))
            .cloned()
            .collect()
    }

    pub fn scenario(&self, id: &ScenarioId) -> Option<Scenario> {
        self.load().resolve(&self.builtins, id)
    }

    pub fn active_id(&self) -> Option<ScenarioId> {
        self.load().active_id
    }

    /// The active scenario, or `None` when the pointer is unset or dangling.
    pub fn active_scenario(&self) -> Option<Scenario> {
        let state = self.load();
        let id = state.active_id.as_ref()?;
        state.resolve(&self.builtins, id)
    }

    pub fn create(&self, draft: ScenarioDraft) -> Result<Scenario, ScenarioStoreError> {
        let builtins = &self.builtins;
        let created =
            self.transact(|state| state.with_scenario_created(draft, builtins, Utc::now()))?;
        info!(scenario = %created.id, "scenario created");
        Ok(created)
    }

    pub fn update(
        &self,
        id: &ScenarioId,
        patch: ScenarioPatch,
    ) -> Result<Scenario, ScenarioStoreError> {
        let builtins = &self.builtins;
        let updated =
            self.transact(|state| state.with_scenario_updated(id, patch, builtins, Utc::now()))?;
        debug!(scenario = %updated.id, "scenario updated");
        Ok(updated)
    }

    /// Delete a user scenario. Returns `false` when no such scenario exists.
    pub fn delete(&self, id: &ScenarioId) -> Result<bool, ScenarioStoreError> {
        if is_reserved(&self.builtins, id) {
            return Err(ScenarioStoreError::ReadOnly(id.clone()));
        }
        let removed = self.transact(|state| Ok(state.without_scenario(id)))?;
        if removed {
            info!(scenario = %id, "scenario deleted");
        }
        Ok(removed)
    }

    pub fn hide(&self, id: &ScenarioId) -> Result<bool, ScenarioStoreError> {
        let builtins = &self.builtins;
        self.transact(|state| state.with_hidden(id, builtins))
    }

    pub fn unhide(&self, id: &ScenarioId) -> Result<bool, ScenarioStoreError> {
        self.transact(|state| Ok(state.with_unhidden(id)))
    }

    pub fn reorder(&self, ids: Vec<ScenarioId>) -> Result<(), ScenarioStoreError> {
        self.transact(|state| Ok((state.with_order(ids), ())))
    }

    /// Point the session at `id`, or clear the pointer with `None`.
    pub fn set_active(&self, id: Option<&ScenarioId>) -> Result<(), ScenarioStoreError> {
        let builtins = &self.builtins;
        self.transact(|state| {
            if let Some(id) = id {
                if state.resolve(builtins, id).is_none() {
                    return Err(ScenarioStoreError::NotFound(id.clone()));
                }
            }
            Ok((state.with_active(id.cloned()), ()))
        })
    }

    /// Auto-save of the live working state. Also makes it the active scenario.
    pub fn save_live_state(&self, live: LiveState) -> Result<(), ScenarioStoreError> {
        self.transact(|state| {
            Ok((
                state
                    .with_live_state(live)
                    .with_active(Some(ScenarioId::live())),
                (),
            ))
        })
    }

    pub fn live_scenario(&self) -> Option<Scenario> {
        self.load().custom_state.map(Scenario::live)
    }

    /// Serialize any resolvable scenario into a share payload.
    pub fn export_scenario(&self, id: &ScenarioId) -> Result<String, ScenarioStoreError> {
        let scenario = self
            .scenario(id)
            .ok_or_else(|| ScenarioStoreError::NotFound(id.clone()))?;
        let shared = SharedScenario {
            version: SHARE_VERSION,
            id: scenario.id,
            label: scenario.label,
            description: scenario.description,
            filters: scenario.filters,
            weights: scenario.weights,
            shared_at: Some(Utc::now()),
        };
        Ok(serde_json::to_string(&shared)?)
    }

    /// Store a share payload as a new user scenario based on the shared id.
    pub fn import_scenario(&self, payload: &str) -> Result<Scenario, ScenarioStoreError> {
        let shared: SharedScenario = serde_json::from_str(payload)
            .map_err(|err| ScenarioStoreError::InvalidShare(err.to_string()))?;
        if shared.version > SHARE_VERSION {
            return Err(ScenarioStoreError::InvalidShare(format!(
                "unsupported share version {}",
                shared.version
            )));
        }

        self.create(ScenarioDraft {
            label: shared.label,
            description: shared.description,
            filters: shared.filters,
            weights: shared.weights,
            based_on: Some(shared.id),
        })
    }

    /// One-time conversion of legacy presets into user scenarios. The legacy
    /// key is removed once the converted scenarios are persisted; presets
    /// already present from a run that could not remove it are not appended
    /// again.
    pub fn migrate_legacy(
        &self,
        ranges: &DataRanges,
    ) -> Result<MigrationReport, ScenarioStoreError> {
        let raw = match self.backend.get(&self.legacy_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(MigrationReport::default()),
            Err(err) => {
                warn!(
                    key = %self.legacy_key,
                    error = %err,
                    "legacy presets unavailable; skipping migration"
                );
                return Ok(MigrationReport::default());
            }
        };

        let (converted, skipped) = convert_legacy_presets(&raw, ranges, Utc::now());
        let builtins = &self.builtins;
        let migrated = self.transact(|mut state| {
            let existing = state.custom.clone();
            let mut migrated = Vec::with_capacity(converted.len());
            for preset in converted {
                // Left over from a run that could not remove the legacy key.
                if existing.iter().any(|scenario| preset.matches_existing(scenario)) {
                    debug!(label = %preset.draft.label, "legacy preset already migrated");
                    continue;
                }
                let (next, scenario) =
                    state.with_scenario_created(preset.draft, builtins, preset.saved_at)?;
                state = next;
                migrated.push(scenario.id);
            }
            Ok((state, migrated))
        })?;
        if let Err(err) = self.backend.remove(&self.legacy_key) {
            warn!(
                key = %self.legacy_key,
                error = %err,
                "legacy presets migrated but not removed"
            );
        }

        let report = MigrationReport { migrated, skipped };
        info!(
            migrated = report.migrated.len(),
            skipped = report.skipped,
            "legacy presets migrated"
        );
        Ok(report)
    }
}
