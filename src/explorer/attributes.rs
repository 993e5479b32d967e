use super::domain::Vehicle;
use super::scoring::{DataRange, DataRanges};

/// How the slider domain of an attribute is determined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeBounds {
    Fixed { min: f64, max: f64 },
    DataDerived,
}

/// Declarative descriptor of one scorable and/or filterable dimension.
#[derive(Clone, Copy)]
pub struct AttributeSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    weight_key: Option<&'static str>,
    pub bounds: AttributeBounds,
    pub scoring: bool,
    pub filtering: bool,
    extract: fn(&Vehicle) -> f64,
}

impl AttributeSpec {
    /// Key under which this attribute reads its weight. Defaults to the id.
    pub fn weight_key(&self) -> &'static str {
        self.weight_key.unwrap_or(self.id)
    }

    pub fn has_custom_weight_key(&self) -> bool {
        self.weight_key.is_some()
    }

    pub fn value(&self, vehicle: &Vehicle) -> f64 {
        (self.extract)(vehicle)
    }

    /// Slider domain: declared bounds when fixed, otherwise the observed data range.
    pub fn domain(&self, ranges: &DataRanges) -> Option<DataRange> {
        match self.bounds {
            AttributeBounds::Fixed { min, max } => Some(DataRange { min, max }),
            AttributeBounds::DataDerived => ranges.get(self.id),
        }
    }

    pub fn format_value(&self, value: f64) -> String {
        match self.id {
            "price" => format!("${}", group_thousands(value.round() as i64)),
            _ if self.unit.is_empty() => trim_number(value),
            _ => format!("{} {}", trim_number(value), self.unit),
        }
    }
}

impl std::fmt::Debug for AttributeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeSpec")
            .field("id", &self.id)
            .field("weight_key", &self.weight_key())
            .field("bounds", &self.bounds)
            .field("scoring", &self.scoring)
            .field("filtering", &self.filtering)
            .finish()
    }
}

const RATING: AttributeBounds = AttributeBounds::Fixed {
    min: 1.0,
    max: 10.0,
};

static ATTRIBUTES: [AttributeSpec; 9] = [
    AttributeSpec {
        id: "price",
        label: "Price",
        unit: "USD",
        weight_key: None,
        bounds: AttributeBounds::DataDerived,
        // price is bounded by the dedicated price filter and never scored
        scoring: false,
        filtering: false,
        extract: |v| v.price,
    },
    AttributeSpec {
        id: "mpg",
        label: "Fuel Economy",
        unit: "mpg",
        weight_key: None,
        bounds: AttributeBounds::DataDerived,
        scoring: true,
        filtering: true,
        extract: |v| v.mpg,
    },
    AttributeSpec {
        id: "offroad",
        label: "Off-Road",
        unit: "",
        weight_key: None,
        bounds: RATING,
        scoring: true,
        filtering: true,
        extract: |v| v.offroad,
    },
    AttributeSpec {
        id: "luxury",
        label: "Luxury",
        unit: "",
        weight_key: None,
        bounds: RATING,
        scoring: true,
        filtering: true,
        extract: |v| v.luxury,
    },
    AttributeSpec {
        id: "reliability",
        label: "Reliability",
        unit: "",
        weight_key: None,
        bounds: RATING,
        scoring: true,
        filtering: true,
        extract: |v| v.reliability,
    },
    AttributeSpec {
        id: "performance",
        label: "Performance",
        unit: "",
        weight_key: None,
        bounds: RATING,
        scoring: true,
        filtering: true,
        extract: |v| v.performance,
    },
    AttributeSpec {
        id: "cargo",
        label: "Cargo Volume",
        unit: "cu ft",
        weight_key: None,
        bounds: AttributeBounds::DataDerived,
        scoring: true,
        filtering: true,
        extract: |v| v.cargo,
    },
    AttributeSpec {
        id: "tow",
        label: "Towing",
        unit: "lbs",
        weight_key: Some("towing"),
        bounds: AttributeBounds::DataDerived,
        scoring: true,
        filtering: false,
        extract: |v| v.tow,
    },
    AttributeSpec {
        id: "clearance",
        label: "Ground Clearance",
        unit: "in",
        weight_key: None,
        bounds: AttributeBounds::DataDerived,
        scoring: true,
        filtering: false,
        extract: |v| v.clearance,
    },
];

/// The full attribute table in declaration order.
pub fn all() -> &'static [AttributeSpec] {
    &ATTRIBUTES
}

pub fn find(id: &str) -> Option<&'static AttributeSpec> {
    ATTRIBUTES.iter().find(|spec| spec.id == id)
}

pub fn scoring() -> Vec<&'static AttributeSpec> {
    ATTRIBUTES.iter().filter(|spec| spec.scoring).collect()
}

pub fn filtering() -> Vec<&'static AttributeSpec> {
    ATTRIBUTES.iter().filter(|spec| spec.filtering).collect()
}

/// Distinct weight keys of all scoring attributes, in table order.
pub fn weight_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = Vec::new();
    for spec in ATTRIBUTES.iter().filter(|spec| spec.scoring) {
        if !keys.contains(&spec.weight_key()) {
            keys.push(spec.weight_key());
        }
    }
    keys
}

fn trim_number(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tow_scores_under_towing_weight_key() {
        let tow = find("tow").expect("tow attribute present");
        assert!(tow.has_custom_weight_key());
        assert_eq!(tow.weight_key(), "towing");
        assert_eq!(find("mpg").expect("mpg present").weight_key(), "mpg");
    }

    #[test]
    fn weight_keys_cover_every_scoring_attribute() {
        let keys = weight_keys();
        assert_eq!(keys.len(), scoring().len());
        assert!(keys.contains(&"towing"));
        assert!(!keys.contains(&"price"));
    }

    #[test]
    fn side_channel_attributes_are_not_generic_filters() {
        let ids: Vec<&str> = filtering().iter().map(|spec| spec.id).collect();
        assert!(!ids.contains(&"tow"));
        assert!(!ids.contains(&"clearance"));
        assert!(ids.contains(&"offroad"));
    }

    #[test]
    fn formats_values_with_units() {
        assert_eq!(
            find("price").expect("price").format_value(42500.0),
            "$42,500"
        );
        assert_eq!(find("tow").expect("tow").format_value(3500.0), "3500 lbs");
        assert_eq!(
            find("clearance").expect("clearance").format_value(8.7),
            "8.7 in"
        );
        assert_eq!(find("offroad").expect("offroad").format_value(7.0), "7");
    }

    #[test]
    fn fixed_bounds_take_precedence_over_data() {
        let ranges = DataRanges::default();
        let offroad = find("offroad").expect("offroad");
        assert_eq!(
            offroad.domain(&ranges),
            Some(DataRange {
                min: 1.0,
                max: 10.0
            })
        );
        assert_eq!(find("cargo").expect("cargo").domain(&ranges), None);
    }
}
