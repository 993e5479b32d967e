use serde::Serialize;

use super::{
    body_ok, clearance_ok, make_ok, powertrain_ok, price_ok, query_ok, size_ok, towing_ok,
    FilterConfig, RangeFilter,
};
use crate::explorer::attributes::{self, AttributeSpec};
use crate::explorer::domain::Vehicle;

/// A violated filter with the required and the actual value, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterReason {
    pub filter: String,
    pub label: String,
    pub required: String,
    pub actual: String,
}

impl FilterReason {
    pub fn summary(&self) -> String {
        format!("{}: {} (requires {})", self.label, self.actual, self.required)
    }
}

/// Every filter `vehicle` violates under `config`.
///
/// Unlike [`super::vehicle_passes_filters`] this evaluates each predicate
/// independently and never stops at the first failure.
pub fn get_filter_reasons(vehicle: &Vehicle, config: &FilterConfig) -> Vec<FilterReason> {
    let mut reasons = Vec::new();

    if !price_ok(vehicle, config) {
        let price = attributes::find("price");
        reasons.push(FilterReason {
            filter: "price".to_string(),
            label: "Price".to_string(),
            required: describe_range(price, config.price),
            actual: format_with(price, vehicle.price),
        });
    }

    if !powertrain_ok(vehicle, config) {
        reasons.push(FilterReason {
            filter: "powertrain".to_string(),
            label: "Powertrain".to_string(),
            required: describe_allowed(config.powertrains.iter().map(|p| p.label())),
            actual: vehicle.powertrain.label().to_string(),
        });
    }

    if !size_ok(vehicle, config) {
        reasons.push(FilterReason {
            filter: "size".to_string(),
            label: "Size".to_string(),
            required: describe_allowed(config.sizes.iter().map(|s| s.label())),
            actual: vehicle.size.label().to_string(),
        });
    }

    if !body_ok(vehicle, config) {
        reasons.push(FilterReason {
            filter: "body".to_string(),
            label: "Body Type".to_string(),
            required: describe_allowed(config.bodies.iter().map(|b| b.label())),
            actual: vehicle.body.label().to_string(),
        });
    }

    if !make_ok(vehicle, config) {
        reasons.push(FilterReason {
            filter: "make".to_string(),
            label: "Manufacturer".to_string(),
            required: describe_allowed(config.makes.iter().map(String::as_str)),
            actual: vehicle.make.clone(),
        });
    }

    if !query_ok(vehicle, config) {
        reasons.push(FilterReason {
            filter: "query".to_string(),
            label: "Search".to_string(),
            required: format!("matches \"{}\"", config.query.as_deref().unwrap_or_default()),
            actual: vehicle.search_text(),
        });
    }

    if !towing_ok(vehicle, config) {
        let tow = attributes::find("tow");
        reasons.push(FilterReason {
            filter: "minTowing".to_string(),
            label: "Towing".to_string(),
            required: describe_range(
                tow,
                RangeFilter {
                    min: config.min_towing,
                    max: None,
                },
            ),
            actual: format_with(tow, vehicle.tow),
        });
    }

    if !clearance_ok(vehicle, config) {
        let clearance = attributes::find("clearance");
        reasons.push(FilterReason {
            filter: "minClearance".to_string(),
            label: "Ground Clearance".to_string(),
            required: describe_range(
                clearance,
                RangeFilter {
                    min: config.min_clearance,
                    max: None,
                },
            ),
            actual: format_with(clearance, vehicle.clearance),
        });
    }

    for (spec, filter) in config.active_ranges() {
        let value = spec.value(vehicle);
        if !filter.contains(value) {
            reasons.push(FilterReason {
                filter: spec.id.to_string(),
                label: spec.label.to_string(),
                required: describe_range(Some(spec), filter),
                actual: spec.format_value(value),
            });
        }
    }

    reasons
}

fn format_with(spec: Option<&AttributeSpec>, value: f64) -> String {
    match spec {
        Some(spec) => spec.format_value(value),
        None => value.to_string(),
    }
}

fn describe_range(spec: Option<&AttributeSpec>, filter: RangeFilter) -> String {
    match (filter.min, filter.max) {
        (Some(min), Some(max)) => format!(
            "between {} and {}",
            format_with(spec, min),
            format_with(spec, max)
        ),
        (Some(min), None) => format!("at least {}", format_with(spec, min)),
        (None, Some(max)) => format!("at most {}", format_with(spec, max)),
        (None, None) => "any value".to_string(),
    }
}

fn describe_allowed<'a>(allowed: impl Iterator<Item = &'a str>) -> String {
    let allowed: Vec<&str> = allowed.collect();
    if allowed.is_empty() {
        "no allowed values".to_string()
    } else {
        format!("one of {}", allowed.join(", "))
    }
}
