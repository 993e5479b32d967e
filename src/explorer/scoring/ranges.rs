use std::collections::BTreeMap;

use serde::Serialize;

use crate::explorer::attributes::AttributeSpec;
use crate::explorer::domain::Vehicle;

/// Observed `[min, max]` of one attribute across the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataRange {
    pub min: f64,
    pub max: f64,
}

impl DataRange {
    /// Zero-width ranges cannot normalize anything.
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    pub fn normalize(&self, value: f64) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some((value - self.min) / (self.max - self.min))
    }
}

/// Per-attribute data ranges keyed by attribute id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataRanges(BTreeMap<&'static str, DataRange>);

impl DataRanges {
    pub fn get(&self, id: &str) -> Option<DataRange> {
        self.0.get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Minimum and maximum value of each attribute actually present in `catalog`.
///
/// An empty catalog yields empty ranges; scoring against them always returns 0.
pub fn compute_data_ranges(catalog: &[Vehicle], attrs: &[AttributeSpec]) -> DataRanges {
    let mut ranges = BTreeMap::new();

    for spec in attrs {
        let mut observed: Option<DataRange> = None;
        for vehicle in catalog {
            let value = spec.value(vehicle);
            if !value.is_finite() {
                continue;
            }
            observed = Some(match observed {
                Some(range) => DataRange {
                    min: range.min.min(value),
                    max: range.max.max(value),
                },
                None => DataRange {
                    min: value,
                    max: value,
                },
            });
        }

        if let Some(range) = observed {
            ranges.insert(spec.id, range);
        }
    }

    DataRanges(ranges)
}
