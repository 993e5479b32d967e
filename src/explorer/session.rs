//! Wires the active scenario through range calculation, filtering and scoring.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::attributes;
use super::catalog::Catalog;
use super::domain::{BodyType, Powertrain, SizeClass, Vehicle};
use super::filters::{
    get_filter_reasons, vehicle_passes_filters, FilterConfig, FilterReason, RangeFilter,
};
use super::scenarios::builtin;
use super::scenarios::{
    KeyValueStore, LiveState, MigrationReport, Scenario, ScenarioDraft, ScenarioFilters,
    ScenarioId, ScenarioKind, ScenarioPatch, ScenarioStore, ScenarioStoreError,
    LIVE_SCENARIO_LABEL,
};
use super::scoring::{
    compute_data_ranges, DataRanges, ScoreComponent, ScoringEngine, WeightVector,
};
use crate::config::ScoringConfig;

/// Error raised by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] ScenarioStoreError),
    #[error("`{0}` is not a filterable attribute")]
    UnknownAttribute(String),
    #[error("`{0}` is not a scoring weight key")]
    UnknownWeightKey(String),
    #[error("the active configuration is not backed by a saved scenario")]
    NothingToUpdate,
}

/// Weights and filters currently driving results, with the scenario they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveConfiguration {
    pub scenario: ScenarioId,
    pub kind: ScenarioKind,
    pub label: String,
    pub weights: WeightVector,
    pub filters: ScenarioFilters,
    /// Last applied named scenario while tuning the live state.
    pub based_on: Option<ScenarioId>,
}

impl ActiveConfiguration {
    fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            scenario: scenario.id.clone(),
            kind: scenario.kind,
            label: scenario.label.clone(),
            weights: scenario.weights.clone(),
            filters: scenario.filters.clone(),
            based_on: scenario.based_on.clone(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.kind == ScenarioKind::LiveWorking
    }

    fn live_state(&self) -> LiveState {
        LiveState {
            weights: self.weights.clone(),
            filters: self.filters.clone(),
            based_on: self.based_on.clone(),
        }
    }

    /// The saved scenario an update-in-place would write to.
    fn update_target(&self) -> Option<&ScenarioId> {
        match self.kind {
            ScenarioKind::UserSaved => Some(&self.scenario),
            ScenarioKind::LiveWorking => self.based_on.as_ref(),
            ScenarioKind::BuiltIn => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredVehicle<'a> {
    pub vehicle: &'a Vehicle,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedVehicle<'a> {
    pub vehicle: &'a Vehicle,
    pub reasons: Vec<FilterReason>,
}

/// Ranked matches and the vehicles filtered out, with why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorerResults<'a> {
    pub matches: Vec<ScoredVehicle<'a>>,
    pub excluded: Vec<ExcludedVehicle<'a>>,
}

/// One user's view over a catalog: the active configuration, a transient
/// search query and the scenario store backing it.
pub struct ExplorerSession<S> {
    catalog: Catalog,
    store: ScenarioStore<S>,
    engine: ScoringEngine,
    ranges: DataRanges,
    active: ActiveConfiguration,
    query: Option<String>,
    migration: MigrationReport,
}

impl<S> ExplorerSession<S>
where
    S: KeyValueStore + 'static,
{
    /// Migrate legacy presets, then restore the persisted active scenario,
    /// falling back to reset when it no longer resolves.
    pub fn open(
        catalog: Catalog,
        store: ScenarioStore<S>,
        config: &ScoringConfig,
    ) -> Result<Self, SessionError> {
        let ranges = compute_data_ranges(catalog.vehicles(), attributes::all());
        let migration = store.migrate_legacy(&ranges)?;

        let reset = builtin::reset();
        let mut session = Self {
            catalog,
            store,
            engine: ScoringEngine::new(config.score_floor),
            ranges,
            active: ActiveConfiguration::from_scenario(&reset),
            query: None,
            migration,
        };

        if let Some(id) = session.store.active_id() {
            match session.store.scenario(&id) {
                Some(mut scenario) => {
                    let stale_base = scenario
                        .based_on
                        .as_ref()
                        .filter(|base| session.store.scenario(base).is_none());
                    if let Some(base) = stale_base {
                        debug!(scenario = %base, "live scenario base no longer exists");
                        scenario.based_on = None;
                    }
                    session.activate(&scenario);
                }
                None => {
                    warn!(scenario = %id, "persisted active scenario is gone; using reset");
                    session.store.set_active(None)?;
                }
            }
        }

        info!(
            vehicles = session.catalog.len(),
            scenario = %session.active.scenario,
            migrated = session.migration.migrated.len(),
            "explorer session opened"
        );
        Ok(session)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &ScenarioStore<S> {
        &self.store
    }

    pub fn ranges(&self) -> &DataRanges {
        &self.ranges
    }

    pub fn active(&self) -> &ActiveConfiguration {
        &self.active
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Legacy presets converted while opening.
    pub fn migration(&self) -> &MigrationReport {
        &self.migration
    }

    pub fn visible_scenarios(&self) -> Vec<Scenario> {
        self.store.visible_scenarios()
    }

    fn activate(&mut self, scenario: &Scenario) {
        self.active = ActiveConfiguration::from_scenario(scenario);
        debug!(scenario = %scenario.id, kind = scenario.kind.label(), "scenario applied");
    }

    fn fall_back_to_reset(&mut self) -> Result<Scenario, SessionError> {
        let reset = builtin::reset();
        self.store.set_active(None)?;
        self.activate(&reset);
        Ok(reset)
    }

    /// Replace the active configuration with `id`. Unknown or hidden ids fall
    /// back to reset and clear the persisted pointer.
    pub fn apply_scenario(&mut self, id: &ScenarioId) -> Result<Scenario, SessionError> {
        let Some(scenario) = self.store.scenario(id) else {
            warn!(scenario = %id, "scenario not found; falling back to reset");
            return self.fall_back_to_reset();
        };

        self.store.set_active(Some(&scenario.id))?;
        self.activate(&scenario);
        Ok(scenario)
    }

    /// Apply a tuning edit and persist the result as the live scenario.
    fn tune(&mut self, edit: impl FnOnce(&mut ActiveConfiguration)) -> Result<(), SessionError> {
        let mut next = self.active.clone();
        if !next.is_live() {
            next.based_on = Some(next.scenario.clone());
            next.scenario = ScenarioId::live();
            next.kind = ScenarioKind::LiveWorking;
            next.label = LIVE_SCENARIO_LABEL.to_string();
        }
        edit(&mut next);

        self.store.save_live_state(next.live_state())?;
        self.active = next;
        Ok(())
    }

    pub fn set_weight(&mut self, key: &str, weight: u8) -> Result<(), SessionError> {
        if !attributes::weight_keys().contains(&key) {
            return Err(SessionError::UnknownWeightKey(key.to_string()));
        }
        self.tune(|active| active.weights.set(key, weight))
    }

    /// An inactive filter removes the bound for `attribute`.
    pub fn set_range_filter(
        &mut self,
        attribute: &str,
        filter: RangeFilter,
    ) -> Result<(), SessionError> {
        let spec = attributes::find(attribute)
            .filter(|spec| spec.filtering)
            .ok_or_else(|| SessionError::UnknownAttribute(attribute.to_string()))?;
        self.tune(|active| {
            if filter.is_active() {
                active.filters.ranges.insert(spec.id.to_string(), filter);
            } else {
                active.filters.ranges.remove(spec.id);
            }
        })
    }

    pub fn set_price_range(&mut self, filter: RangeFilter) -> Result<(), SessionError> {
        self.tune(|active| active.filters.price = filter.is_active().then_some(filter))
    }

    pub fn set_allowed_powertrains(
        &mut self,
        allowed: Vec<Powertrain>,
    ) -> Result<(), SessionError> {
        self.tune(|active| active.filters.powertrains = Some(allowed))
    }

    pub fn set_allowed_sizes(&mut self, allowed: Vec<SizeClass>) -> Result<(), SessionError> {
        self.tune(|active| active.filters.sizes = Some(allowed))
    }

    pub fn set_allowed_bodies(&mut self, allowed: Vec<BodyType>) -> Result<(), SessionError> {
        self.tune(|active| active.filters.bodies = Some(allowed))
    }

    /// An empty list lifts the manufacturer restriction.
    pub fn set_allowed_makes(&mut self, allowed: Vec<String>) -> Result<(), SessionError> {
        self.tune(|active| {
            active.filters.makes = (!allowed.is_empty()).then_some(allowed);
        })
    }

    pub fn set_min_towing(&mut self, minimum: Option<f64>) -> Result<(), SessionError> {
        self.tune(|active| active.filters.min_towing = minimum)
    }

    pub fn set_min_clearance(&mut self, minimum: Option<f64>) -> Result<(), SessionError> {
        self.tune(|active| active.filters.min_clearance = minimum)
    }

    /// Free-text search. Not persisted; blank clears it.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.query = (!query.trim().is_empty()).then_some(query);
    }

    pub fn clear_query(&mut self) {
        self.query = None;
    }

    /// Save the active weights and filters as a new user scenario and apply it.
    pub fn save_as(&mut self, label: &str, description: &str) -> Result<Scenario, SessionError> {
        let based_on = match self.active.kind {
            ScenarioKind::LiveWorking => self.active.based_on.clone(),
            _ => Some(self.active.scenario.clone()),
        };
        let created = self.store.create(ScenarioDraft {
            label: label.to_string(),
            description: description.to_string(),
            filters: self.active.filters.clone(),
            weights: self.active.weights.clone(),
            based_on,
        })?;

        self.store.set_active(Some(&created.id))?;
        self.activate(&created);
        Ok(created)
    }

    /// Write the active weights and filters back into the user scenario they
    /// came from. Live tuning remembers its base across restarts until that
    /// scenario is deleted or hidden.
    pub fn update_active(&mut self) -> Result<Scenario, SessionError> {
        let target = self
            .active
            .update_target()
            .cloned()
            .ok_or(SessionError::NothingToUpdate)?;

        let updated = self.store.update(
            &target,
            ScenarioPatch {
                filters: Some(self.active.filters.clone()),
                weights: Some(self.active.weights.clone()),
                ..ScenarioPatch::default()
            },
        )?;

        self.store.set_active(Some(&updated.id))?;
        self.activate(&updated);
        Ok(updated)
    }

    pub fn delete_scenario(&mut self, id: &ScenarioId) -> Result<bool, SessionError> {
        let removed = self.store.delete(id)?;
        if removed {
            self.forget(id)?;
        }
        Ok(removed)
    }

    pub fn hide_scenario(&mut self, id: &ScenarioId) -> Result<bool, SessionError> {
        let hidden = self.store.hide(id)?;
        if hidden {
            self.forget(id)?;
        }
        Ok(hidden)
    }

    pub fn unhide_scenario(&mut self, id: &ScenarioId) -> Result<bool, SessionError> {
        Ok(self.store.unhide(id)?)
    }

    pub fn reorder_scenarios(&mut self, ids: Vec<ScenarioId>) -> Result<(), SessionError> {
        Ok(self.store.reorder(ids)?)
    }

    /// Drop every reference to a scenario that just disappeared.
    fn forget(&mut self, id: &ScenarioId) -> Result<(), SessionError> {
        if self.active.based_on.as_ref() == Some(id) {
            self.active.based_on = None;
            if self.active.is_live() {
                self.store.save_live_state(self.active.live_state())?;
            }
        }
        if &self.active.scenario != id {
            return Ok(());
        }
        info!(scenario = %id, "active scenario removed; falling back to reset");
        self.fall_back_to_reset().map(|_| ())
    }

    /// Evaluator configuration for the active filters plus the search query.
    pub fn filter_config(&self) -> FilterConfig {
        let mut config = self.active.filters.resolve();
        config.query = self.query.clone();
        config
    }

    pub fn score(&self, vehicle: &Vehicle) -> u8 {
        self.engine
            .score(vehicle, &self.active.weights, &self.ranges, attributes::all())
    }

    pub fn breakdown(&self, vehicle: &Vehicle) -> Vec<ScoreComponent> {
        self.engine
            .breakdown(vehicle, &self.active.weights, &self.ranges, attributes::all())
    }

    /// Matches ranked by score, then price, then id; exclusions in catalog order.
    pub fn results(&self) -> ExplorerResults<'_> {
        let config = self.filter_config();
        let mut matches = Vec::new();
        let mut excluded = Vec::new();

        for vehicle in self.catalog.vehicles() {
            if vehicle_passes_filters(vehicle, &config) {
                matches.push(ScoredVehicle {
                    vehicle,
                    score: self.score(vehicle),
                });
            } else {
                excluded.push(ExcludedVehicle {
                    vehicle,
                    reasons: get_filter_reasons(vehicle, &config),
                });
            }
        }

        matches.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| {
                    a.vehicle
                        .price
                        .partial_cmp(&b.vehicle.price)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.vehicle.id.cmp(&b.vehicle.id))
        });

        ExplorerResults { matches, excluded }
    }
}
