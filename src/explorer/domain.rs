use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog vehicles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog record as curated upstream. The engine never mutates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub trim: Option<String>,
    pub generation: String,
    pub year: u16,
    pub price: f64,
    pub mpg: f64,
    pub offroad: f64,
    pub luxury: f64,
    pub reliability: f64,
    pub performance: f64,
    pub cargo: f64,
    pub tow: f64,
    pub clearance: f64,
    pub powertrain: Powertrain,
    pub size: SizeClass,
    pub body: BodyType,
}

impl Vehicle {
    /// Display name used in listings and diagnostics.
    pub fn display_name(&self) -> String {
        match &self.trim {
            Some(trim) if !trim.trim().is_empty() => {
                format!("{} {} {} {}", self.year, self.make, self.model, trim)
            }
            _ => format!("{} {} {}", self.year, self.make, self.model),
        }
    }

    /// Text the free-text query is matched against.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.make, &self.model];
        if let Some(trim) = &self.trim {
            parts.push(trim);
        }
        parts.push(&self.generation);
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Powertrain {
    Gas,
    Diesel,
    Hybrid,
    PlugInHybrid,
    Electric,
}

impl Powertrain {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Gas,
            Self::Diesel,
            Self::Hybrid,
            Self::PlugInHybrid,
            Self::Electric,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Gas => "Gas",
            Self::Diesel => "Diesel",
            Self::Hybrid => "Hybrid",
            Self::PlugInHybrid => "Plug-in Hybrid",
            Self::Electric => "Electric",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Compact,
    Midsize,
    Fullsize,
}

impl SizeClass {
    pub const fn ordered() -> [Self; 3] {
        [Self::Compact, Self::Midsize, Self::Fullsize]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Compact => "Compact",
            Self::Midsize => "Midsize",
            Self::Fullsize => "Full-size",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    Suv,
    Truck,
    Sedan,
    Wagon,
    Minivan,
    Hatchback,
    Coupe,
}

impl BodyType {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Suv,
            Self::Truck,
            Self::Sedan,
            Self::Wagon,
            Self::Minivan,
            Self::Hatchback,
            Self::Coupe,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Suv => "SUV",
            Self::Truck => "Truck",
            Self::Sedan => "Sedan",
            Self::Wagon => "Wagon",
            Self::Minivan => "Minivan",
            Self::Hatchback => "Hatchback",
            Self::Coupe => "Coupe",
        }
    }
}
