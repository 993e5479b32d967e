//! Catalog fixtures shared by the unit tests.

use super::domain::{BodyType, Powertrain, SizeClass, Vehicle, VehicleId};

/// A mid-pack vehicle; tests override the fields they care about.
pub(crate) fn vehicle(id: &str) -> Vehicle {
    Vehicle {
        id: VehicleId(id.to_string()),
        make: "Generic".to_string(),
        model: "Model".to_string(),
        trim: None,
        generation: "1st gen".to_string(),
        year: 2024,
        price: 35_000.0,
        mpg: 25.0,
        offroad: 5.0,
        luxury: 5.0,
        reliability: 5.0,
        performance: 5.0,
        cargo: 30.0,
        tow: 3_000.0,
        clearance: 7.0,
        powertrain: Powertrain::Gas,
        size: SizeClass::Midsize,
        body: BodyType::Suv,
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    make: &str,
    model: &str,
    trim: Option<&str>,
    generation: &str,
    price: f64,
    mpg: f64,
    ratings: [f64; 4],
    cargo: f64,
    tow: f64,
    clearance: f64,
    classes: (Powertrain, SizeClass, BodyType),
) -> Vehicle {
    let [offroad, luxury, reliability, performance] = ratings;
    Vehicle {
        id: VehicleId(id.to_string()),
        make: make.to_string(),
        model: model.to_string(),
        trim: trim.map(str::to_string),
        generation: generation.to_string(),
        year: 2024,
        price,
        mpg,
        offroad,
        luxury,
        reliability,
        performance,
        cargo,
        tow,
        clearance,
        powertrain: classes.0,
        size: classes.1,
        body: classes.2,
    }
}

pub(crate) fn sample_catalog() -> Vec<Vehicle> {
    vec![
        entry(
            "toyota-4runner-trd-pro",
            "Toyota",
            "4Runner",
            Some("TRD Pro"),
            "5th gen",
            56_000.0,
            17.0,
            [9.0, 5.0, 9.0, 5.0],
            47.2,
            5_000.0,
            9.6,
            (Powertrain::Gas, SizeClass::Midsize, BodyType::Suv),
        ),
        entry(
            "honda-cr-v-hybrid",
            "Honda",
            "CR-V",
            Some("Sport Touring Hybrid"),
            "6th gen",
            41_000.0,
            37.0,
            [3.0, 6.0, 9.0, 5.0],
            39.3,
            1_000.0,
            8.2,
            (Powertrain::Hybrid, SizeClass::Compact, BodyType::Suv),
        ),
        entry(
            "ford-f150-lightning",
            "Ford",
            "F-150 Lightning",
            Some("Lariat"),
            "14th gen",
            70_000.0,
            70.0,
            [6.0, 7.0, 7.0, 8.0],
            52.8,
            10_000.0,
            8.9,
            (Powertrain::Electric, SizeClass::Fullsize, BodyType::Truck),
        ),
        entry(
            "lexus-rx-350",
            "Lexus",
            "RX",
            Some("350 Premium"),
            "5th gen",
            52_000.0,
            24.0,
            [2.0, 9.0, 9.0, 6.0],
            29.6,
            3_500.0,
            7.9,
            (Powertrain::Gas, SizeClass::Midsize, BodyType::Suv),
        ),
        entry(
            "subaru-outback-wilderness",
            "Subaru",
            "Outback",
            Some("Wilderness"),
            "6th gen",
            42_000.0,
            24.0,
            [7.0, 4.0, 7.0, 4.0],
            32.6,
            3_500.0,
            9.5,
            (Powertrain::Gas, SizeClass::Midsize, BodyType::Wagon),
        ),
        entry(
            "toyota-sienna",
            "Toyota",
            "Sienna",
            None,
            "4th gen",
            39_000.0,
            36.0,
            [2.0, 5.0, 9.0, 3.0],
            101.0,
            3_500.0,
            6.0,
            (Powertrain::Hybrid, SizeClass::Fullsize, BodyType::Minivan),
        ),
        entry(
            "jeep-wrangler-4xe",
            "Jeep",
            "Wrangler",
            Some("Rubicon 4xe"),
            "JL",
            62_000.0,
            49.0,
            [10.0, 4.0, 4.0, 6.0],
            31.7,
            3_500.0,
            10.8,
            (Powertrain::PlugInHybrid, SizeClass::Midsize, BodyType::Suv),
        ),
        entry(
            "ram-2500-cummins",
            "Ram",
            "2500",
            Some("Power Wagon"),
            "5th gen",
            74_000.0,
            15.0,
            [8.0, 5.0, 6.0, 6.0],
            60.0,
            17_000.0,
            14.5,
            (Powertrain::Diesel, SizeClass::Fullsize, BodyType::Truck),
        ),
    ]
}
