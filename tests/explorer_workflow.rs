use vehicle_explorer::explorer::attributes;
use vehicle_explorer::explorer::filters::{
    fuzzy_match, get_filter_reasons, vehicle_passes_filters, FilterConfig, RangeFilter,
};
use vehicle_explorer::explorer::scoring::{calculate_score, compute_data_ranges, WeightVector};
use vehicle_explorer::explorer::{BodyType, Catalog, Powertrain, Vehicle};

const CATALOG_CSV: &str = "\
id,make,model,trim,generation,year,price,mpg,offroad,luxury,reliability,performance,cargo,tow,clearance,powertrain,size,body
toyota-4runner-trd-pro,Toyota,4Runner,TRD Pro,5th gen,2024,56000,17,9,5,9,5,47.2,5000,9.6,gas,midsize,suv
honda-cr-v-hybrid,Honda,CR-V,Sport Touring Hybrid,6th gen,2024,41000,37,3,6,9,5,39.3,1000,8.2,hybrid,compact,suv
ford-f150-lightning,Ford,F-150 Lightning,Lariat,14th gen,2024,70000,70,6,7,7,8,52.8,10000,8.9,electric,fullsize,truck
lexus-rx-350,Lexus,RX,350 Premium,5th gen,2024,52000,24,2,9,9,6,29.6,3500,7.9,gas,midsize,suv
subaru-outback-wilderness,Subaru,Outback,Wilderness,6th gen,2024,42000,24,7,4,7,4,32.6,3500,9.5,gas,midsize,wagon
toyota-sienna,Toyota,Sienna,,4th gen,2024,39000,36,2,5,9,3,101,3500,6.0,hybrid,fullsize,minivan
jeep-wrangler-4xe,Jeep,Wrangler,Rubicon 4xe,JL,2024,62000,49,10,4,4,6,31.7,3500,10.8,plug_in_hybrid,midsize,suv
ram-2500-cummins,Ram,2500,Power Wagon,5th gen,2024,74000,15,8,5,6,6,60,17000,14.5,diesel,fullsize,truck
";

fn catalog() -> Catalog {
    Catalog::from_csv_reader(CATALOG_CSV.as_bytes()).expect("catalog parses")
}

fn find<'a>(catalog: &'a Catalog, id: &str) -> &'a Vehicle {
    catalog.get(id).expect("vehicle present")
}

fn passing(catalog: &Catalog, config: &FilterConfig) -> Vec<String> {
    catalog
        .vehicles()
        .iter()
        .filter(|vehicle| vehicle_passes_filters(vehicle, config))
        .map(|vehicle| vehicle.id.0.clone())
        .collect()
}

#[test]
fn scores_stay_within_bounds_for_any_weighting() {
    let catalog = catalog();
    let ranges = compute_data_ranges(catalog.vehicles(), attributes::all());

    for weight in 0..=5 {
        let weights = WeightVector::uniform(weight);
        for vehicle in catalog.vehicles() {
            let score = calculate_score(vehicle, &weights, &ranges, attributes::all());
            assert!(score <= 100);
            if weight == 0 {
                assert_eq!(score, 0, "zero weights score 0 for {}", vehicle.id);
            }
        }
    }
}

#[test]
fn empty_catalog_scores_zero() {
    let catalog = catalog();
    let ranges = compute_data_ranges(&[], attributes::all());
    assert!(ranges.is_empty());
    let score = calculate_score(
        find(&catalog, "jeep-wrangler-4xe"),
        &WeightVector::neutral(),
        &ranges,
        attributes::all(),
    );
    assert_eq!(score, 0);
}

#[test]
fn emphasis_flips_between_off_road_and_luxury() {
    let catalog = catalog();
    let ranges = compute_data_ranges(catalog.vehicles(), attributes::all());
    let jeep = find(&catalog, "jeep-wrangler-4xe");
    let lexus = find(&catalog, "lexus-rx-350");

    let trail = WeightVector::new().with("offroad", 5);
    let plush = WeightVector::new().with("luxury", 5);

    let score = |vehicle: &Vehicle, weights: &WeightVector| {
        calculate_score(vehicle, weights, &ranges, attributes::all())
    };

    assert_eq!(score(jeep, &trail), 100);
    assert_eq!(score(lexus, &trail), 5);
    assert_eq!(score(lexus, &plush), 100);
    assert_eq!(score(jeep, &plush), 5);
}

#[test]
fn raising_a_weighted_attribute_never_lowers_the_score() {
    let catalog = catalog();
    let ranges = compute_data_ranges(catalog.vehicles(), attributes::all());
    let weights = WeightVector::neutral();

    let mut probe = find(&catalog, "subaru-outback-wilderness").clone();
    let mut previous = calculate_score(&probe, &weights, &ranges, attributes::all());
    for step in 1..=20 {
        probe.mpg = 24.0 + f64::from(step) * 2.5;
        let current = calculate_score(&probe, &weights, &ranges, attributes::all());
        assert!(current >= previous, "mpg {} scored {current} < {previous}", probe.mpg);
        previous = current;
    }
}

#[test]
fn fuzzy_search_matches_every_token() {
    let catalog = catalog();
    let runner = find(&catalog, "toyota-4runner-trd-pro").search_text();

    assert!(fuzzy_match("toyota trd", &runner));
    assert!(fuzzy_match("  4RUNNER   5th ", &runner));
    assert!(fuzzy_match("", &runner));
    assert!(!fuzzy_match("toyota hybrid", &runner));
}

#[test]
fn filtering_is_idempotent_and_narrowing_is_monotone() {
    let catalog = catalog();
    let ranges = compute_data_ranges(catalog.vehicles(), attributes::all());

    let full = FilterConfig::full_range(&ranges);
    assert_eq!(passing(&catalog, &full).len(), catalog.len());

    let mut config = full.clone().with_range("mpg", RangeFilter::between(20.0, 60.0));
    let first = passing(&catalog, &config);
    let second = passing(&catalog, &config);
    assert_eq!(first, second);

    config.bodies = vec![BodyType::Suv, BodyType::Wagon];
    let narrower = passing(&catalog, &config);
    assert!(narrower.iter().all(|id| first.contains(id)));

    config.powertrains = vec![Powertrain::Gas];
    let narrowest = passing(&catalog, &config);
    assert!(narrowest.iter().all(|id| narrower.contains(id)));
    assert_eq!(narrowest, vec!["lexus-rx-350", "subaru-outback-wilderness"]);
}

#[test]
fn reasons_name_each_violated_filter() {
    let catalog = catalog();
    let mut config = FilterConfig::unrestricted();
    config.powertrains = vec![Powertrain::Electric];
    config.min_towing = Some(12_000.0);

    let ram = find(&catalog, "ram-2500-cummins");
    let sienna = find(&catalog, "toyota-sienna");

    let ram_reasons = get_filter_reasons(ram, &config);
    assert_eq!(ram_reasons.len(), 1);
    assert_eq!(ram_reasons[0].filter, "powertrain");
    assert_eq!(ram_reasons[0].actual, "Diesel");

    let sienna_reasons: Vec<String> = get_filter_reasons(sienna, &config)
        .into_iter()
        .map(|reason| reason.filter)
        .collect();
    assert_eq!(sienna_reasons, vec!["powertrain", "minTowing"]);
}

#[test]
fn manufacturer_filter_is_case_insensitive_and_empty_means_everyone() {
    let catalog = catalog();
    let mut config = FilterConfig::unrestricted();
    assert_eq!(passing(&catalog, &config).len(), 8);

    config.makes = vec!["TOYOTA".to_string(), "ram".to_string()];
    assert_eq!(
        passing(&catalog, &config),
        vec!["toyota-4runner-trd-pro", "toyota-sienna", "ram-2500-cummins"]
    );

    config.makes.clear();
    config.sizes.clear();
    assert!(passing(&catalog, &config).is_empty(), "empty size list rejects all");
}
