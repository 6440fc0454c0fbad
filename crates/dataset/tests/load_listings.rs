use core_types::{ListingDetails, PredictionBasis};
use dataset::{DatasetCache, DatasetError, cities, filter_by_city, find_by_id, load};
use rust_decimal_macros::dec;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const FULL_CSV: &str = "\
id,city,lat,lon,area,price_per_area,price,predicted_price,rooms,floor,floors_total,year_built,wall_material,kitchen_area,passenger_elevators,cargo_elevators,bathroom,metro,metro_minutes
101,Moscow,55.75,37.61,60,33333.33,2000000,2300000,2,5,9,2000,brick,10.5,1,0,combined,Okhotny Ryad,7
102,Moscow,55.751,37.611,45,40000,1800000,2100000,1,2,5,1975,panel,,1,,separate,,
201,Kazan,55.79,49.12,70,30000,2100000,2500000,3,,,,,,,,,,
";

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_required_and_descriptive_fields() {
    let file = write_csv(FULL_CSV);
    let listings = load(file.path(), PredictionBasis::Total).unwrap();

    assert_eq!(listings.len(), 3);
    let first = &listings[0];
    assert_eq!(first.id, "101");
    assert_eq!(first.city, "Moscow");
    assert_eq!(first.coordinates.latitude, 55.75);
    assert_eq!(first.area, dec!(60));
    assert_eq!(first.entry_price, dec!(2000000));
    assert_eq!(first.expected_sale_price, dec!(2300000));
    assert_eq!(first.details.rooms, Some(2));
    assert_eq!(first.details.wall_material.as_deref(), Some("brick"));
    assert_eq!(first.details.metro_minutes, Some(7));

    let second = &listings[1];
    assert_eq!(second.details.kitchen_area, None);
    assert_eq!(second.details.metro, None);

    assert_eq!(cities(&listings), ["Moscow", "Kazan"]);
    let moscow = filter_by_city(&listings, "Moscow");
    assert_eq!(moscow.len(), 2);
    assert!(find_by_id(moscow.iter().copied(), "201").is_err());
}

#[test]
fn descriptive_columns_are_optional() {
    let file = write_csv(
        "id,city,lat,lon,area,price_per_area,price,predicted_price\n\
         a,X,55.75,37.61,60,1000,2000000,2300000\n",
    );
    let listings = load(file.path(), PredictionBasis::Total).unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].details, ListingDetails::default());
}

#[test]
fn per_area_prediction_is_scaled_by_area() {
    let file = write_csv(
        "id,city,lat,lon,area,price_per_area,price,predicted_price\n\
         a,X,55.75,37.61,60,1000,2000000,40000\n",
    );
    let listings = load(file.path(), PredictionBasis::PerArea).unwrap();
    assert_eq!(listings[0].expected_sale_price, dec!(2400000));
}

#[test]
fn per_area_prediction_that_overflows_is_unavailable() {
    let file = write_csv(
        "id,city,lat,lon,area,price_per_area,price,predicted_price\n\
         a,X,55.75,37.61,60,1000,2000000,5e27\n",
    );
    assert!(load(file.path(), PredictionBasis::Total).is_ok());
    let err = load(file.path(), PredictionBasis::PerArea).unwrap_err();
    assert!(matches!(err, DatasetError::DataUnavailable { ref reason, .. } if reason.contains("overflows")));
}

#[test]
fn identifiers_keep_leading_zeros() {
    let file = write_csv(
        "id,city,lat,lon,area,price_per_area,price,predicted_price\n\
         0101,Moscow,55.75,37.61,60,1000,2000000,2300000\n\
         0102,Moscow,55.751,37.611,45,1000,1800000,2100000\n",
    );
    let listings = load(file.path(), PredictionBasis::Total).unwrap();
    assert_eq!(listings[0].id, "0101");

    let moscow = filter_by_city(&listings, "Moscow");
    let found = find_by_id(moscow.iter().copied(), "0101").unwrap();
    assert_eq!(found.entry_price, dec!(2000000));
    assert!(find_by_id(moscow.iter().copied(), "101").is_err());
}

#[test]
fn stray_text_late_in_a_descriptive_column_only_blanks_that_cell() {
    let mut csv = String::from("id,city,lat,lon,area,price_per_area,price,predicted_price,metro_minutes\n");
    for i in 0..150 {
        csv.push_str(&format!("{i},Moscow,55.75,37.61,60,1000,2000000,2300000,5\n"));
    }
    csv.push_str("late,Moscow,55.75,37.61,60,1000,2000000,2300000,about 7\n");
    let file = write_csv(&csv);

    let listings = load(file.path(), PredictionBasis::Total).unwrap();
    assert_eq!(listings.len(), 151);
    assert_eq!(listings[0].details.metro_minutes, Some(5));
    assert_eq!(listings[150].id, "late");
    assert_eq!(listings[150].details.metro_minutes, None);
}

#[test]
fn missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&dir.path().join("nope.csv"), PredictionBasis::Total).unwrap_err();
    assert!(matches!(err, DatasetError::DataUnavailable { .. }));
}

#[test]
fn missing_required_column_is_unavailable() {
    let file = write_csv(
        "id,city,lat,area,price_per_area,price,predicted_price\n\
         a,X,55.75,60,1000,2000000,2300000\n",
    );
    match load(file.path(), PredictionBasis::Total) {
        Err(DatasetError::DataUnavailable { reason, .. }) => assert!(reason.contains("'lon'")),
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn unparsable_or_invalid_coordinates_are_unavailable() {
    let empty_lat = write_csv(
        "id,city,lat,lon,area,price_per_area,price,predicted_price\n\
         a,X,55.75,37.61,60,1000,2000000,2300000\n\
         b,X,,37.61,60,1000,2000000,2300000\n",
    );
    assert!(matches!(
        load(empty_lat.path(), PredictionBasis::Total),
        Err(DatasetError::DataUnavailable { .. })
    ));

    let out_of_range = write_csv(
        "id,city,lat,lon,area,price_per_area,price,predicted_price\n\
         a,X,95.0,37.61,60,1000,2000000,2300000\n",
    );
    assert!(matches!(
        load(out_of_range.path(), PredictionBasis::Total),
        Err(DatasetError::DataUnavailable { .. })
    ));
}

#[test]
fn duplicate_identifiers_are_rejected() {
    let file = write_csv(
        "id,city,lat,lon,area,price_per_area,price,predicted_price\n\
         a,X,55.75,37.61,60,1000,2000000,2300000\n\
         a,X,55.76,37.62,60,1000,2000000,2300000\n",
    );
    match load(file.path(), PredictionBasis::Total) {
        Err(DatasetError::DataUnavailable { reason, .. }) => assert!(reason.contains("duplicate")),
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn cache_loads_each_source_once() {
    let file = write_csv(FULL_CSV);
    let mut cache = DatasetCache::new();
    assert!(cache.is_empty());

    let first = cache.get_or_load(file.path(), PredictionBasis::Total).unwrap();
    let second = cache.get_or_load(file.path(), PredictionBasis::Total).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    let per_area = cache.get_or_load(file.path(), PredictionBasis::PerArea).unwrap();
    assert!(!Arc::ptr_eq(&first, &per_area));
    assert_eq!(cache.len(), 2);
}

#[test]
fn cache_does_not_remember_failures() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = DatasetCache::new();
    assert!(cache.get_or_load(&dir.path().join("missing.csv"), PredictionBasis::Total).is_err());
    assert!(cache.is_empty());
}
