//! Pure `(PersistedState, args) -> PersistedState` transforms behind every store operation.

use chrono::{DateTime, Utc};

use super::domain::{
    LiveState, PersistedState, Scenario, ScenarioDraft, ScenarioId, ScenarioKind, ScenarioPatch,
    LIVE_SCENARIO_ID, RESET_SCENARIO_ID,
};
use super::store::ScenarioStoreError;

impl PersistedState {
    /// Built-ins minus hidden and reset, then user scenarios, in custom order when set.
    pub fn visible_scenarios(&self, builtins: &[Scenario]) -> Vec<Scenario> {
        let mut visible: Vec<Scenario> = builtins
            .iter()
            .filter(|scenario| scenario.id.as_str() != RESET_SCENARIO_ID)
            .filter(|scenario| !self.hidden.contains(&scenario.id))
            .cloned()
            .chain(self.custom.iter().cloned())
            .collect();

        if let Some(order) = &self.order {
            // stable sort: ids missing from the order keep declaration order at the end
            visible.sort_by_key(|scenario| {
                order
                    .iter()
                    .position(|id| id == &scenario.id)
                    .unwrap_or(usize::MAX)
            });
        }

        visible
    }

    /// Resolve an id to an applicable scenario. Hidden built-ins do not resolve;
    /// reset always does.
    pub fn resolve(&self, builtins: &[Scenario], id: &ScenarioId) -> Option<Scenario> {
        if id.as_str() == LIVE_SCENARIO_ID {
            return self.custom_state.clone().map(Scenario::live);
        }

        if let Some(builtin) = builtins.iter().find(|scenario| &scenario.id == id) {
            if id.as_str() == RESET_SCENARIO_ID || !self.hidden.contains(id) {
                return Some(builtin.clone());
            }
            return None;
        }

        self.custom.iter().find(|scenario| &scenario.id == id).cloned()
    }

    /// Clear `activeId` when it no longer resolves.
    pub fn without_dangling_active(mut self, builtins: &[Scenario]) -> Self {
        if let Some(active) = &self.active_id {
            if self.resolve(builtins, active).is_none() {
                self.active_id = None;
            }
        }
        self
    }

    pub fn with_active(mut self, id: Option<ScenarioId>) -> Self {
        self.active_id = id;
        self
    }

    pub fn with_live_state(mut self, state: LiveState) -> Self {
        self.custom_state = Some(state);
        self
    }

    pub fn with_scenario_created(
        mut self,
        draft: ScenarioDraft,
        builtins: &[Scenario],
        now: DateTime<Utc>,
    ) -> Result<(Self, Scenario), ScenarioStoreError> {
        let label = draft.label.trim();
        if label.is_empty() {
            return Err(ScenarioStoreError::EmptyLabel);
        }

        let id = generate_id(label, now, |candidate| {
            builtins.iter().any(|s| s.id.as_str() == candidate)
                || self.custom.iter().any(|s| s.id.as_str() == candidate)
        });

        let scenario = Scenario {
            id,
            label: label.to_string(),
            description: draft.description.trim().to_string(),
            filters: draft.filters,
            weights: draft.weights,
            kind: ScenarioKind::UserSaved,
            created_at: Some(now),
            modified_at: Some(now),
            based_on: draft.based_on,
        };

        self.custom.push(scenario.clone());
        Ok((self, scenario))
    }

    pub fn with_scenario_updated(
        mut self,
        id: &ScenarioId,
        patch: ScenarioPatch,
        builtins: &[Scenario],
        now: DateTime<Utc>,
    ) -> Result<(Self, Scenario), ScenarioStoreError> {
        if is_reserved(builtins, id) {
            return Err(ScenarioStoreError::ReadOnly(id.clone()));
        }

        let scenario = self
            .custom
            .iter_mut()
            .find(|scenario| &scenario.id == id)
            .ok_or_else(|| ScenarioStoreError::NotFound(id.clone()))?;

        if let Some(label) = patch.label {
            let label = label.trim();
            if label.is_empty() {
                return Err(ScenarioStoreError::EmptyLabel);
            }
            scenario.label = label.to_string();
        }
        if let Some(description) = patch.description {
            scenario.description = description.trim().to_string();
        }
        if let Some(filters) = patch.filters {
            scenario.filters = filters;
        }
        if let Some(weights) = patch.weights {
            scenario.weights = weights;
        }
        scenario.modified_at = Some(now);

        let updated = scenario.clone();
        Ok((self, updated))
    }

    /// Remove a user scenario. Returns whether anything was removed.
    pub fn without_scenario(mut self, id: &ScenarioId) -> (Self, bool) {
        let before = self.custom.len();
        self.custom.retain(|scenario| &scenario.id != id);
        let removed = self.custom.len() != before;

        if removed {
            self.clear_references(id);
        }
        (self, removed)
    }

    pub fn with_hidden(
        mut self,
        id: &ScenarioId,
        builtins: &[Scenario],
    ) -> Result<(Self, bool), ScenarioStoreError> {
        if id.as_str() == RESET_SCENARIO_ID {
            return Ok((self, false));
        }
        if !builtins.iter().any(|scenario| &scenario.id == id) {
            return Err(self.not_built_in(id));
        }
        if self.hidden.contains(id) {
            return Ok((self, false));
        }

        self.hidden.push(id.clone());
        if self.active_id.as_ref() == Some(id) {
            self.active_id = None;
        }
        Ok((self, true))
    }

    pub fn with_unhidden(mut self, id: &ScenarioId) -> (Self, bool) {
        let before = self.hidden.len();
        self.hidden.retain(|hidden| hidden != id);
        let changed = self.hidden.len() != before;
        (self, changed)
    }

    /// Replace the custom display order. Duplicates collapse; an empty order
    /// restores declaration order.
    pub fn with_order(mut self, ids: Vec<ScenarioId>) -> Self {
        let mut order: Vec<ScenarioId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !order.contains(&id) {
                order.push(id);
            }
        }
        self.order = if order.is_empty() { None } else { Some(order) };
        self
    }

    fn clear_references(&mut self, id: &ScenarioId) {
        if self.active_id.as_ref() == Some(id) {
            self.active_id = None;
        }
        if let Some(order) = &mut self.order {
            order.retain(|entry| entry != id);
        }
    }

    fn not_built_in(&self, id: &ScenarioId) -> ScenarioStoreError {
        if self.custom.iter().any(|scenario| &scenario.id == id) {
            ScenarioStoreError::NotBuiltIn(id.clone())
        } else {
            ScenarioStoreError::NotFound(id.clone())
        }
    }
}

/// Built-in ids and the live id never name a mutable user scenario.
pub(crate) fn is_reserved(builtins: &[Scenario], id: &ScenarioId) -> bool {
    id.as_str() == LIVE_SCENARIO_ID || builtins.iter().any(|scenario| &scenario.id == id)
}

/// URL-safe slug of `label` plus a base-36 millisecond suffix, made unique
/// against `taken`.
pub(crate) fn generate_id(
    label: &str,
    now: DateTime<Utc>,
    taken: impl Fn(&str) -> bool,
) -> ScenarioId {
    let slug = slugify(label);
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let base = format!("{slug}-{}", to_base36(millis));

    let mut candidate = base.clone();
    let mut counter = 2;
    while taken(&candidate) {
        candidate = format!("{base}-{counter}");
        counter += 1;
    }
    ScenarioId(candidate)
}

pub(crate) fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;

    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "scenario".to_string()
    } else {
        slug.chars().take(48).collect::<String>().trim_end_matches('-').to_string()
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
