use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::explorer::domain::{BodyType, Powertrain, SizeClass};
use crate::explorer::filters::{FilterConfig, RangeFilter};
use crate::explorer::scoring::WeightVector;

/// Reserved id of the auto-saved working state.
pub const LIVE_SCENARIO_ID: &str = "custom";
/// Reserved id of the built-in "no filters, neutral weights" fallback.
pub const RESET_SCENARIO_ID: &str = "reset";
pub const LIVE_SCENARIO_LABEL: &str = "Custom";

/// URL-safe scenario identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub String);

impl ScenarioId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn live() -> Self {
        Self(LIVE_SCENARIO_ID.to_string())
    }

    pub fn reset() -> Self {
        Self(RESET_SCENARIO_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Shipped with the crate; never mutated, may be hidden.
    BuiltIn,
    /// Created by an explicit save.
    #[default]
    UserSaved,
    /// The continuously auto-saved working state.
    LiveWorking,
}

impl ScenarioKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BuiltIn => "built-in",
            Self::UserSaved => "saved",
            Self::LiveWorking => "custom",
        }
    }
}

/// Hard requirements stored on a scenario.
///
/// Absent allow-lists leave that category unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<RangeFilter>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ranges: BTreeMap<String, RangeFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powertrains: Option<Vec<Powertrain>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<SizeClass>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bodies: Option<Vec<BodyType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub makes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_towing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_clearance: Option<f64>,
}

impl ScenarioFilters {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Lower into the evaluator's configuration. No free-text query is carried.
    pub fn resolve(&self) -> FilterConfig {
        let mut config = FilterConfig::unrestricted();
        if let Some(price) = self.price {
            config.price = price;
        }
        config.ranges = self
            .ranges
            .iter()
            .filter(|(_, filter)| filter.is_active())
            .map(|(id, filter)| (id.clone(), *filter))
            .collect();
        if let Some(powertrains) = &self.powertrains {
            config.powertrains = powertrains.clone();
        }
        if let Some(sizes) = &self.sizes {
            config.sizes = sizes.clone();
        }
        if let Some(bodies) = &self.bodies {
            config.bodies = bodies.clone();
        }
        if let Some(makes) = &self.makes {
            config.makes = makes.clone();
        }
        config.min_towing = self.min_towing;
        config.min_clearance = self.min_clearance;
        config
    }
}

/// Snapshot of the live working state: everything a scenario carries except identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveState {
    #[serde(default)]
    pub weights: WeightVector,
    #[serde(default)]
    pub filters: ScenarioFilters,
    /// Named scenario the tuning started from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<ScenarioId>,
}

/// A named combination of hard filters and scoring weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: ScenarioId,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub filters: ScenarioFilters,
    #[serde(default)]
    pub weights: WeightVector,
    #[serde(default)]
    pub kind: ScenarioKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<ScenarioId>,
}

impl Scenario {
    pub fn is_built_in(&self) -> bool {
        self.kind == ScenarioKind::BuiltIn
    }

    pub fn is_live(&self) -> bool {
        self.kind == ScenarioKind::LiveWorking
    }

    /// Materialize the live working scenario from its persisted snapshot.
    pub fn live(state: LiveState) -> Self {
        Self {
            id: ScenarioId::live(),
            label: LIVE_SCENARIO_LABEL.to_string(),
            description: "Your current adjustments".to_string(),
            filters: state.filters,
            weights: state.weights,
            kind: ScenarioKind::LiveWorking,
            created_at: None,
            modified_at: None,
            based_on: state.based_on,
        }
    }

    pub fn live_state(&self) -> LiveState {
        LiveState {
            weights: self.weights.clone(),
            filters: self.filters.clone(),
            based_on: self.based_on.clone(),
        }
    }
}

/// Input for creating a user scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioDraft {
    pub label: String,
    pub description: String,
    pub filters: ScenarioFilters,
    pub weights: WeightVector,
    pub based_on: Option<ScenarioId>,
}

/// Partial update applied in place to a user scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub filters: Option<ScenarioFilters>,
    pub weights: Option<WeightVector>,
}

/// The serialized envelope persisted under a single key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub custom: Vec<Scenario>,
    #[serde(default)]
    pub hidden: Vec<ScenarioId>,
    #[serde(default)]
    pub active_id: Option<ScenarioId>,
    #[serde(default)]
    pub order: Option<Vec<ScenarioId>>,
    #[serde(default)]
    pub custom_state: Option<LiveState>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_envelope_serializes_with_nulls() {
        let json = serde_json::to_value(PersistedState::default()).expect("serialize");
        assert_eq!(
            json,
            json!({
                "custom": [],
                "hidden": [],
                "activeId": null,
                "order": null,
                "customState": null
            })
        );
    }

    #[test]
    fn missing_kind_defaults_to_user_saved() {
        let scenario: Scenario = serde_json::from_value(json!({
            "id": "weekend-1",
            "label": "Weekend"
        }))
        .expect("parse minimal scenario");
        assert_eq!(scenario.kind, ScenarioKind::UserSaved);
        assert!(scenario.filters.is_empty());
        assert!(scenario.weights.is_all_zero());
    }

    #[test]
    fn absent_allow_lists_resolve_to_every_category() {
        let filters = ScenarioFilters {
            bodies: Some(vec![BodyType::Truck]),
            min_towing: Some(7_500.0),
            ..ScenarioFilters::default()
        };
        let config = filters.resolve();
        assert_eq!(config.powertrains, Powertrain::ordered().to_vec());
        assert_eq!(config.bodies, vec![BodyType::Truck]);
        assert!(config.makes.is_empty());
        assert_eq!(config.min_towing, Some(7_500.0));
        assert!(config.query.is_none());
    }

    #[test]
    fn live_scenario_uses_reserved_id() {
        let live = Scenario::live(LiveState::default());
        assert!(live.is_live());
        assert_eq!(live.id.as_str(), LIVE_SCENARIO_ID);
    }
}
