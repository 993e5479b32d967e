mod reasons;
mod search;

pub use reasons::{get_filter_reasons, FilterReason};
pub use search::fuzzy_match;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attributes::{self, AttributeSpec};
use super::domain::{BodyType, Powertrain, SizeClass, Vehicle};
use super::scoring::DataRanges;

/// Inclusive bound on one attribute. `None` on either end means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl RangeFilter {
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Everything the evaluator needs to accept or reject a vehicle.
///
/// Empty powertrain, size, or body allow-lists reject every vehicle; an empty
/// manufacturer list places no restriction.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub price: RangeFilter,
    pub ranges: BTreeMap<String, RangeFilter>,
    pub powertrains: Vec<Powertrain>,
    pub sizes: Vec<SizeClass>,
    pub bodies: Vec<BodyType>,
    pub makes: Vec<String>,
    pub query: Option<String>,
    pub min_towing: Option<f64>,
    pub min_clearance: Option<f64>,
    pub attributes: &'static [AttributeSpec],
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::unrestricted()
    }
}

impl FilterConfig {
    /// No bounds, every category allowed.
    pub fn unrestricted() -> Self {
        Self {
            price: RangeFilter::unbounded(),
            ranges: BTreeMap::new(),
            powertrains: Powertrain::ordered().to_vec(),
            sizes: SizeClass::ordered().to_vec(),
            bodies: BodyType::ordered().to_vec(),
            makes: Vec::new(),
            query: None,
            min_towing: None,
            min_clearance: None,
            attributes: attributes::all(),
        }
    }

    /// Explicit bounds at the data extremes for price and every filterable attribute.
    pub fn full_range(ranges: &DataRanges) -> Self {
        let mut config = Self::unrestricted();
        if let Some(price) = ranges.get("price") {
            config.price = RangeFilter::between(price.min, price.max);
        }
        for spec in config.attributes.iter().filter(|spec| spec.filtering) {
            if let Some(range) = ranges.get(spec.id) {
                config
                    .ranges
                    .insert(spec.id.to_string(), RangeFilter::between(range.min, range.max));
            }
        }
        config
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_range(mut self, attribute: &str, filter: RangeFilter) -> Self {
        self.ranges.insert(attribute.to_string(), filter);
        self
    }

    /// Active range filters paired with their filterable attribute.
    pub(crate) fn active_ranges(&self) -> impl Iterator<Item = (&AttributeSpec, RangeFilter)> {
        self.attributes
            .iter()
            .filter(|spec| spec.filtering)
            .filter_map(|spec| {
                self.ranges
                    .get(spec.id)
                    .filter(|filter| filter.is_active())
                    .map(|filter| (spec, *filter))
            })
    }
}

pub(crate) fn price_ok(vehicle: &Vehicle, config: &FilterConfig) -> bool {
    config.price.contains(vehicle.price)
}

pub(crate) fn powertrain_ok(vehicle: &Vehicle, config: &FilterConfig) -> bool {
    config.powertrains.contains(&vehicle.powertrain)
}

pub(crate) fn size_ok(vehicle: &Vehicle, config: &FilterConfig) -> bool {
    config.sizes.contains(&vehicle.size)
}

pub(crate) fn body_ok(vehicle: &Vehicle, config: &FilterConfig) -> bool {
    config.bodies.contains(&vehicle.body)
}

pub(crate) fn make_ok(vehicle: &Vehicle, config: &FilterConfig) -> bool {
    config.makes.is_empty()
        || config
            .makes
            .iter()
            .any(|make| make.trim().eq_ignore_ascii_case(vehicle.make.trim()))
}

pub(crate) fn query_ok(vehicle: &Vehicle, config: &FilterConfig) -> bool {
    match config.query.as_deref() {
        Some(query) => fuzzy_match(query, &vehicle.search_text()),
        None => true,
    }
}

pub(crate) fn towing_ok(vehicle: &Vehicle, config: &FilterConfig) -> bool {
    RangeFilter {
        min: config.min_towing,
        max: None,
    }
    .contains(vehicle.tow)
}

pub(crate) fn clearance_ok(vehicle: &Vehicle, config: &FilterConfig) -> bool {
    RangeFilter {
        min: config.min_clearance,
        max: None,
    }
    .contains(vehicle.clearance)
}

/// Returns `true` only when every predicate holds. Stops at the first failure.
pub fn vehicle_passes_filters(vehicle: &Vehicle, config: &FilterConfig) -> bool {
    price_ok(vehicle, config)
        && powertrain_ok(vehicle, config)
        && size_ok(vehicle, config)
        && body_ok(vehicle, config)
        && make_ok(vehicle, config)
        && query_ok(vehicle, config)
        && towing_ok(vehicle, config)
        && clearance_ok(vehicle, config)
        && config
            .active_ranges()
            .all(|(spec, filter)| filter.contains(spec.value(vehicle)))
}
