use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::explorer::attributes;

pub const MAX_WEIGHT: u8 = 5;
pub const NEUTRAL_WEIGHT: u8 = 3;

/// Per weight-key importance in `0..=MAX_WEIGHT`. Missing keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector(BTreeMap<String, u8>);

impl WeightVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every scoring weight key at the midpoint.
    pub fn neutral() -> Self {
        Self::uniform(NEUTRAL_WEIGHT)
    }

    pub fn uniform(weight: u8) -> Self {
        let mut weights = Self::new();
        for key in attributes::weight_keys() {
            weights.set(key, weight);
        }
        weights
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u8)>,
    {
        let mut weights = Self::new();
        for (key, weight) in pairs {
            weights.set(key, weight);
        }
        weights
    }

    pub fn get(&self, key: &str) -> u8 {
        self.0.get(key).copied().unwrap_or(0).min(MAX_WEIGHT)
    }

    pub fn set(&mut self, key: &str, weight: u8) {
        self.0.insert(key.to_string(), weight.min(MAX_WEIGHT));
    }

    /// Builder-style variant of [`WeightVector::set`].
    pub fn with(mut self, key: &str, weight: u8) -> Self {
        self.set(key, weight);
        self
    }

    pub fn is_all_zero(&self) -> bool {
        self.0.values().all(|weight| *weight == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0
            .iter()
            .map(|(key, weight)| (key.as_str(), (*weight).min(MAX_WEIGHT)))
    }
}
