use std::collections::BTreeMap;

use super::domain::{Scenario, ScenarioFilters, ScenarioId, ScenarioKind, RESET_SCENARIO_ID};
use crate::explorer::domain::{BodyType, Powertrain, SizeClass};
use crate::explorer::filters::RangeFilter;
use crate::explorer::scoring::WeightVector;

/// Scenarios shipped with the crate, in declaration order. The first is the
/// unlisted reset target.
pub fn standard() -> Vec<Scenario> {
    vec![
        reset(),
        built_in(
            "daily-commuter",
            "Daily Commuter",
            "Efficient, dependable transport for the daily drive.",
            ScenarioFilters {
                price: Some(RangeFilter::at_most(45_000.0)),
                ranges: ranges([("mpg", RangeFilter::at_least(30.0))]),
                ..ScenarioFilters::default()
            },
            WeightVector::from_pairs([
                ("mpg", 5),
                ("reliability", 5),
                ("luxury", 2),
                ("performance", 1),
                ("cargo", 1),
            ]),
        ),
        built_in(
            "family-hauler",
            "Family Hauler",
            "Room for everyone and their gear, with a strong reliability record.",
            ScenarioFilters {
                sizes: Some(vec![SizeClass::Midsize, SizeClass::Fullsize]),
                bodies: Some(vec![BodyType::Suv, BodyType::Minivan, BodyType::Wagon]),
                ..ScenarioFilters::default()
            },
            WeightVector::from_pairs([
                ("cargo", 5),
                ("reliability", 4),
                ("mpg", 3),
                ("luxury", 2),
                ("towing", 1),
            ]),
        ),
        built_in(
            "trail-ready",
            "Trail Ready",
            "Capable off pavement without giving up daily usability.",
            ScenarioFilters {
                ranges: ranges([("offroad", RangeFilter::at_least(6.0))]),
                min_clearance: Some(8.5),
                ..ScenarioFilters::default()
            },
            WeightVector::from_pairs([
                ("offroad", 5),
                ("clearance", 4),
                ("reliability", 3),
                ("cargo", 2),
                ("mpg", 1),
            ]),
        ),
        built_in(
            "tow-rig",
            "Tow Rig",
            "Pulls a camper or a boat trailer with margin to spare.",
            ScenarioFilters {
                bodies: Some(vec![BodyType::Truck, BodyType::Suv]),
                min_towing: Some(7_000.0),
                ..ScenarioFilters::default()
            },
            WeightVector::from_pairs([
                ("towing", 5),
                ("reliability", 4),
                ("performance", 3),
                ("cargo", 2),
            ]),
        ),
        built_in(
            "luxury-cruiser",
            "Luxury Cruiser",
            "Quiet, refined, and quick.",
            ScenarioFilters {
                ranges: ranges([("luxury", RangeFilter::at_least(7.0))]),
                ..ScenarioFilters::default()
            },
            WeightVector::from_pairs([
                ("luxury", 5),
                ("performance", 4),
                ("reliability", 3),
                ("mpg", 1),
            ]),
        ),
        built_in(
            "electrified",
            "Electrified",
            "Hybrids, plug-ins, and full electrics.",
            ScenarioFilters {
                powertrains: Some(vec![
                    Powertrain::Hybrid,
                    Powertrain::PlugInHybrid,
                    Powertrain::Electric,
                ]),
                ..ScenarioFilters::default()
            },
            WeightVector::from_pairs([
                ("mpg", 5),
                ("reliability", 3),
                ("performance", 3),
                ("cargo", 2),
            ]),
        ),
    ]
}

/// Fallback target whenever the active scenario stops resolving.
pub fn reset() -> Scenario {
    built_in(
        RESET_SCENARIO_ID,
        "Reset",
        "No filters, neutral weights.",
        ScenarioFilters::default(),
        WeightVector::neutral(),
    )
}

fn built_in(
    id: &str,
    label: &str,
    description: &str,
    filters: ScenarioFilters,
    weights: WeightVector,
) -> Scenario {
    Scenario {
        id: ScenarioId::new(id),
        label: label.to_string(),
        description: description.to_string(),
        filters,
        weights,
        kind: ScenarioKind::BuiltIn,
        created_at: None,
        modified_at: None,
        based_on: None,
    }
}

fn ranges<const N: usize>(entries: [(&str, RangeFilter); N]) -> BTreeMap<String, RangeFilter> {
    entries
        .into_iter()
        .map(|(id, filter)| (id.to_string(), filter))
        .collect()
}
