use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::domain::{Scenario, ScenarioDraft, ScenarioFilters, ScenarioId, ScenarioKind};
use crate::explorer::attributes;
use crate::explorer::domain::{BodyType, Powertrain, SizeClass};
use crate::explorer::filters::RangeFilter;
use crate::explorer::scoring::{DataRange, DataRanges, WeightVector};

/// Preset shape written by the previous storage format.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPreset {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    saved_at: Option<Value>,
    #[serde(default)]
    price_range: Option<[Option<f64>; 2]>,
    #[serde(default)]
    ranges: BTreeMap<String, [Option<f64>; 2]>,
    #[serde(default)]
    powertrains: Option<Vec<Powertrain>>,
    #[serde(default)]
    sizes: Option<Vec<SizeClass>>,
    #[serde(default)]
    bodies: Option<Vec<BodyType>>,
    #[serde(default)]
    makes: Option<Vec<String>>,
    #[serde(default)]
    min_towing: Option<f64>,
    #[serde(default)]
    min_clearance: Option<f64>,
}

/// Outcome of a one-time legacy migration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub migrated: Vec<ScenarioId>,
    pub skipped: usize,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.migrated.is_empty() && self.skipped == 0
    }
}

/// A legacy preset ready to be appended as a user scenario.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConvertedPreset {
    pub draft: ScenarioDraft,
    pub saved_at: DateTime<Utc>,
}

impl ConvertedPreset {
    /// Whether `scenario` is this preset as converted by an earlier run.
    pub(crate) fn matches_existing(&self, scenario: &Scenario) -> bool {
        scenario.kind == ScenarioKind::UserSaved
            && scenario.label == self.draft.label.trim()
            && scenario.description == self.draft.description.trim()
            && scenario.filters == self.draft.filters
            && scenario.weights == self.draft.weights
    }
}

/// Parse the legacy array, converting every well-formed preset and counting
/// the rest as skipped. A payload that is not an array skips nothing and
/// converts nothing.
pub(crate) fn convert_legacy_presets(
    raw: &str,
    ranges: &DataRanges,
    now: DateTime<Utc>,
) -> (Vec<ConvertedPreset>, usize) {
    let entries: Vec<Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "legacy presets are not a JSON array; discarding");
            return (Vec::new(), 0);
        }
    };

    let mut converted = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for (index, entry) in entries.into_iter().enumerate() {
        let preset: LegacyPreset = match serde_json::from_value(entry) {
            Ok(preset) => preset,
            Err(err) => {
                warn!(index, error = %err, "skipping malformed legacy preset");
                skipped += 1;
                continue;
            }
        };

        if preset.name.trim().is_empty() {
            warn!(index, "skipping legacy preset without a name");
            skipped += 1;
            continue;
        }

        converted.push(preset.convert(ranges, now));
    }

    (converted, skipped)
}

impl LegacyPreset {
    fn convert(self, ranges: &DataRanges, now: DateTime<Utc>) -> ConvertedPreset {
        let saved_at = self.saved_at.as_ref().and_then(parse_saved_at).unwrap_or(now);

        let mut filters = ScenarioFilters {
            price: self
                .price_range
                .and_then(|bounds| restrictive(bounds, ranges.get("price"))),
            ..ScenarioFilters::default()
        };

        let mut legacy_tow = None;
        let mut legacy_clearance = None;
        for (id, bounds) in self.ranges {
            match id.as_str() {
                "tow" => legacy_tow = bounds[0],
                "clearance" => legacy_clearance = bounds[0],
                _ => {
                    let Some(spec) = attributes::find(&id).filter(|spec| spec.filtering) else {
                        continue;
                    };
                    if let Some(filter) = restrictive(bounds, ranges.get(spec.id)) {
                        filters.ranges.insert(spec.id.to_string(), filter);
                    }
                }
            }
        }

        filters.min_towing = restrictive_minimum(
            larger(self.min_towing, legacy_tow),
            ranges.get("tow"),
        );
        filters.min_clearance = restrictive_minimum(
            larger(self.min_clearance, legacy_clearance),
            ranges.get("clearance"),
        );
        filters.powertrains = narrower(self.powertrains, Powertrain::ordered().len());
        filters.sizes = narrower(self.sizes, SizeClass::ordered().len());
        filters.bodies = narrower(self.bodies, BodyType::ordered().len());
        filters.makes = self.makes.filter(|makes| !makes.is_empty());

        ConvertedPreset {
            draft: ScenarioDraft {
                label: self.name,
                description: self.description.unwrap_or_default(),
                filters,
                weights: WeightVector::neutral(),
                based_on: None,
            },
            saved_at,
        }
    }
}

/// Keep only the ends that cut into the data range. Without a data range
/// every finite end is kept.
fn restrictive(bounds: [Option<f64>; 2], data: Option<DataRange>) -> Option<RangeFilter> {
    let [low, high] = bounds;
    let filter = RangeFilter {
        min: low.filter(|low| low.is_finite() && data.map_or(true, |data| *low > data.min)),
        max: high.filter(|high| high.is_finite() && data.map_or(true, |data| *high < data.max)),
    };
    filter.is_active().then_some(filter)
}

fn restrictive_minimum(minimum: Option<f64>, data: Option<DataRange>) -> Option<f64> {
    minimum.filter(|min| min.is_finite() && data.map_or(true, |data| *min > data.min))
}

fn larger(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn narrower<T: Ord + Copy>(list: Option<Vec<T>>, full: usize) -> Option<Vec<T>> {
    let list = list?;
    let distinct: BTreeSet<T> = list.iter().copied().collect();
    (!distinct.is_empty() && distinct.len() < full).then_some(list)
}

fn parse_saved_at(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        Value::Number(number) => number
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}
