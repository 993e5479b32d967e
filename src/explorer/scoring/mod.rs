mod ranges;
mod weights;

pub use ranges::{compute_data_ranges, DataRange, DataRanges};
pub use weights::{WeightVector, MAX_WEIGHT, NEUTRAL_WEIGHT};

use serde::Serialize;

use super::attributes::AttributeSpec;
use super::domain::Vehicle;

/// Floor applied to normalized values before taking their logarithm.
pub const DEFAULT_SCORE_FLOOR: f64 = 0.05;

/// Stateless scorer computing a normalized weighted geometric mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringEngine {
    floor: f64,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_FLOOR)
    }
}

impl ScoringEngine {
    /// Floors outside `(0, 1)` fall back to [`DEFAULT_SCORE_FLOOR`].
    pub fn new(floor: f64) -> Self {
        let sanitized = if floor.is_finite() && floor > 0.0 && floor < 1.0 {
            floor
        } else {
            DEFAULT_SCORE_FLOOR
        };
        Self { floor: sanitized }
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Desirability in `0..=100`. Zero total weight scores 0.
    pub fn score(
        &self,
        vehicle: &Vehicle,
        weights: &WeightVector,
        ranges: &DataRanges,
        attrs: &[AttributeSpec],
    ) -> u8 {
        let components = self.breakdown(vehicle, weights, ranges, attrs);
        geometric_mean_score(&components)
    }

    /// Per-attribute contributions that feed [`ScoringEngine::score`].
    pub fn breakdown(
        &self,
        vehicle: &Vehicle,
        weights: &WeightVector,
        ranges: &DataRanges,
        attrs: &[AttributeSpec],
    ) -> Vec<ScoreComponent> {
        let mut components = Vec::new();

        for spec in attrs.iter().filter(|spec| spec.scoring) {
            let weight = weights.get(spec.weight_key());
            if weight == 0 {
                continue;
            }
            let Some(normalized) = ranges
                .get(spec.id)
                .and_then(|range| range.normalize(spec.value(vehicle)))
            else {
                continue;
            };
            if !normalized.is_finite() {
                continue;
            }

            components.push(ScoreComponent {
                attribute: spec.id,
                weight,
                normalized: normalized.clamp(self.floor, 1.0),
            });
        }

        components
    }
}

/// One attribute's contribution to a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub attribute: &'static str,
    pub weight: u8,
    /// Normalized value after clamping to `[floor, 1]`.
    pub normalized: f64,
}

fn geometric_mean_score(components: &[ScoreComponent]) -> u8 {
    let mut log_sum = 0.0;
    let mut total_weight = 0.0;

    for component in components {
        let weight = f64::from(component.weight);
        log_sum += weight * component.normalized.ln();
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return 0;
    }

    let score = (100.0 * (log_sum / total_weight).exp()).round();
    score.clamp(0.0, 100.0) as u8
}

/// Score `vehicle` with the default floor.
pub fn calculate_score(
    vehicle: &Vehicle,
    weights: &WeightVector,
    ranges: &DataRanges,
    attrs: &[AttributeSpec],
) -> u8 {
    ScoringEngine::default().score(vehicle, weights, ranges, attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::attributes;
    use crate::explorer::testing::{sample_catalog, vehicle};

    fn ranges_for(catalog: &[Vehicle]) -> DataRanges {
        compute_data_ranges(catalog, attributes::all())
    }

    #[test]
    fn scores_stay_within_bounds() {
        let catalog = sample_catalog();
        let ranges = ranges_for(&catalog);
        let weight_sets = [
            WeightVector::neutral(),
            WeightVector::uniform(MAX_WEIGHT),
            WeightVector::new().with("offroad", 5),
            WeightVector::new().with("luxury", 1).with("towing", 5),
        ];

        for weights in &weight_sets {
            for vehicle in &catalog {
                let score = calculate_score(vehicle, weights, &ranges, attributes::all());
                assert!(score <= 100, "{} scored {score}", vehicle.id);
            }
        }
    }

    #[test]
    fn zero_weights_score_zero() {
        let catalog = sample_catalog();
        let ranges = ranges_for(&catalog);
        let weights = WeightVector::uniform(0);

        for vehicle in &catalog {
            assert_eq!(
                calculate_score(vehicle, &weights, &ranges, attributes::all()),
                0
            );
        }
    }

    #[test]
    fn empty_ranges_score_zero() {
        let catalog = sample_catalog();
        let score = calculate_score(
            &catalog[0],
            &WeightVector::neutral(),
            &DataRanges::default(),
            attributes::all(),
        );
        assert_eq!(score, 0);
    }

    #[test]
    fn best_on_every_attribute_scores_one_hundred() {
        let mut low = vehicle("low");
        let mut high = vehicle("high");
        low.mpg = 15.0;
        high.mpg = 40.0;
        low.offroad = 2.0;
        high.offroad = 9.0;
        let catalog = vec![low, high.clone()];
        let ranges = ranges_for(&catalog);
        let weights = WeightVector::new().with("mpg", 3).with("offroad", 5);

        assert_eq!(
            calculate_score(&high, &weights, &ranges, attributes::all()),
            100
        );
    }

    #[test]
    fn floor_keeps_weakest_attribute_from_zeroing_score() {
        let mut low = vehicle("low");
        let mut high = vehicle("high");
        low.mpg = 15.0;
        high.mpg = 40.0;
        let catalog = vec![low.clone(), high];
        let ranges = ranges_for(&catalog);
        let weights = WeightVector::new().with("mpg", 5);

        assert_eq!(
            calculate_score(&low, &weights, &ranges, attributes::all()),
            5
        );
    }

    #[test]
    fn degenerate_ranges_are_skipped() {
        let mut a = vehicle("a");
        let mut b = vehicle("b");
        a.mpg = 20.0;
        b.mpg = 30.0;
        // identical luxury everywhere: the luxury weight must not matter
        let catalog = vec![a, b.clone()];
        let ranges = ranges_for(&catalog);

        let with_luxury = WeightVector::new().with("mpg", 2).with("luxury", 5);
        let without_luxury = WeightVector::new().with("mpg", 2);
        assert_eq!(
            calculate_score(&b, &with_luxury, &ranges, attributes::all()),
            calculate_score(&b, &without_luxury, &ranges, attributes::all())
        );

        let only_luxury = WeightVector::new().with("luxury", 5);
        assert_eq!(
            calculate_score(&b, &only_luxury, &ranges, attributes::all()),
            0
        );
    }

    #[test]
    fn raising_a_weighted_attribute_never_lowers_the_score() {
        let catalog = sample_catalog();
        let ranges = ranges_for(&catalog);
        let weights = WeightVector::neutral();
        let cargo = ranges.get("cargo").expect("cargo range");
        let step = (cargo.max - cargo.min) / 10.0;

        let mut probe = catalog[1].clone();
        probe.cargo = cargo.min;
        let mut previous = calculate_score(&probe, &weights, &ranges, attributes::all());
        for _ in 0..12 {
            probe.cargo += step;
            let next = calculate_score(&probe, &weights, &ranges, attributes::all());
            assert!(next >= previous, "score dropped from {previous} to {next}");
            previous = next;
        }
    }

    #[test]
    fn values_above_the_data_max_clamp_to_one() {
        let catalog = sample_catalog();
        let ranges = ranges_for(&catalog);
        let weights = WeightVector::new().with("towing", 5);
        let mut monster = catalog[0].clone();
        monster.tow = 1_000_000.0;

        assert_eq!(
            calculate_score(&monster, &weights, &ranges, attributes::all()),
            100
        );
    }

    #[test]
    fn identical_weighted_attributes_score_identically() {
        let catalog = sample_catalog();
        let ranges = ranges_for(&catalog);
        let weights = WeightVector::new().with("offroad", 5).with("mpg", 2);
        let mut twin = catalog[2].clone();
        twin.id = crate::explorer::domain::VehicleId("twin".to_string());
        twin.luxury = 1.0;

        assert_eq!(
            calculate_score(&catalog[2], &weights, &ranges, attributes::all()),
            calculate_score(&twin, &weights, &ranges, attributes::all())
        );
    }

    #[test]
    fn offroad_and_luxury_weights_flip_the_ranking() {
        let mut trail = vehicle("trail");
        trail.offroad = 9.0;
        trail.luxury = 3.0;
        let mut lounge = vehicle("lounge");
        lounge.offroad = 3.0;
        lounge.luxury = 9.0;
        let catalog = vec![trail.clone(), lounge.clone()];
        let ranges = ranges_for(&catalog);

        let offroad_heavy = WeightVector::new().with("offroad", 5).with("luxury", 1);
        let luxury_heavy = WeightVector::new().with("offroad", 1).with("luxury", 5);

        assert!(
            calculate_score(&trail, &offroad_heavy, &ranges, attributes::all())
                > calculate_score(&lounge, &offroad_heavy, &ranges, attributes::all())
        );
        assert!(
            calculate_score(&lounge, &luxury_heavy, &ranges, attributes::all())
                > calculate_score(&trail, &luxury_heavy, &ranges, attributes::all())
        );
    }

    #[test]
    fn breakdown_reports_weighted_components() {
        let catalog = sample_catalog();
        let ranges = ranges_for(&catalog);
        let weights = WeightVector::new().with("towing", 4);
        let components =
            ScoringEngine::default().breakdown(&catalog[0], &weights, &ranges, attributes::all());

        assert_eq!(components.len(), 1);
        assert_eq!(components[0].attribute, "tow");
        assert_eq!(components[0].weight, 4);
        assert!(components[0].normalized >= DEFAULT_SCORE_FLOOR);
    }

    #[test]
    fn invalid_floor_falls_back_to_default() {
        assert_eq!(ScoringEngine::new(0.0).floor(), DEFAULT_SCORE_FLOOR);
        assert_eq!(ScoringEngine::new(f64::NAN).floor(), DEFAULT_SCORE_FLOOR);
        assert_eq!(ScoringEngine::new(0.1).floor(), 0.1);
    }
}
