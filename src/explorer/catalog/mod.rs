//! Read-only vehicle catalog and its CSV/JSON loaders.

mod parser;

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::domain::{Vehicle, VehicleId};

/// Error raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog row on line {line} has no id")]
    MissingId { line: usize },
    #[error("vehicle `{id}` has a non-numeric {field}")]
    InvalidValue { id: VehicleId, field: &'static str },
    #[error("duplicate vehicle id `{0}`")]
    DuplicateId(VehicleId),
}

/// Ordered, id-unique list of vehicles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    vehicles: Vec<Vehicle>,
}

impl Catalog {
    pub fn new(vehicles: Vec<Vehicle>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(vehicles.len());
        for vehicle in &vehicles {
            if !seen.insert(&vehicle.id) {
                return Err(CatalogError::DuplicateId(vehicle.id.clone()));
            }
        }
        Ok(Self { vehicles })
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let catalog = Self::new(parser::parse_csv(reader)?)?;
        debug!(vehicles = catalog.len(), "catalog loaded from CSV");
        Ok(catalog)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Parse a JSON array of vehicle records.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let vehicles: Vec<Vehicle> = serde_json::from_str(raw)?;
        let catalog = Self::new(vehicles)?;
        debug!(vehicles = catalog.len(), "catalog loaded from JSON");
        Ok(catalog)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn get(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Distinct manufacturers, sorted.
    pub fn makes(&self) -> Vec<String> {
        self.vehicles
            .iter()
            .map(|vehicle| vehicle.make.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
