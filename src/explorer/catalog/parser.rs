use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::CatalogError;
use crate::explorer::domain::{BodyType, Powertrain, SizeClass, Vehicle, VehicleId};

/// Parse catalog rows from CSV with a header line. Cells are trimmed and an
/// empty `trim` cell reads as no trim.
pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<Vehicle>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut vehicles = Vec::new();

    for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = record?;
        // header is line 1
        vehicles.push(row.into_vehicle(index + 2)?);
    }

    Ok(vehicles)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    make: String,
    model: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    trim: Option<String>,
    #[serde(default)]
    generation: String,
    year: u16,
    price: f64,
    mpg: f64,
    offroad: f64,
    luxury: f64,
    reliability: f64,
    performance: f64,
    cargo: f64,
    tow: f64,
    clearance: f64,
    powertrain: Powertrain,
    size: SizeClass,
    body: BodyType,
}

impl CatalogRow {
    fn into_vehicle(self, line: usize) -> Result<Vehicle, CatalogError> {
        if self.id.is_empty() {
            return Err(CatalogError::MissingId { line });
        }

        let numbers = [
            ("price", self.price),
            ("mpg", self.mpg),
            ("offroad", self.offroad),
            ("luxury", self.luxury),
            ("reliability", self.reliability),
            ("performance", self.performance),
            ("cargo", self.cargo),
            ("tow", self.tow),
            ("clearance", self.clearance),
        ];
        if let Some((field, _)) = numbers.iter().find(|(_, value)| !value.is_finite()) {
            return Err(CatalogError::InvalidValue {
                id: VehicleId(self.id),
                field: *field,
            });
        }

        Ok(Vehicle {
            id: VehicleId(self.id),
            make: self.make,
            model: self.model,
            trim: self.trim,
            generation: self.generation,
            year: self.year,
            price: self.price,
            mpg: self.mpg,
            offroad: self.offroad,
            luxury: self.luxury,
            reliability: self.reliability,
            performance: self.performance,
            cargo: self.cargo,
            tow: self.tow,
            clearance: self.clearance,
            powertrain: self.powertrain,
            size: self.size,
            body: self.body,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
