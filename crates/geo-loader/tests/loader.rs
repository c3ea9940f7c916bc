use geo_core::config::MissingTypePolicy;
use geo_core::table;
use geo_loader::{
    DEFAULT_LOCATIONS, LoadError, LoadOptions, LoadProgress, MockGeocoder, build_geo_table,
    load_and_save,
};
use serde_json::json;
use tempfile::TempDir;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {expected} ~= {actual}"
    );
}

fn known_places() -> MockGeocoder {
    MockGeocoder::new()
        .with_place("Museum of Modern Art", 40.7618552, -73.9782438, "museum")
        .with_place(
            "USS Alabama Battleship Memorial Park",
            30.684373,
            -88.015316,
            "park",
        )
        .with_place("Alaska", 64.4459613, -149.680909, "administrative")
        .with_timeout("Burj Khalifa")
}

#[test]
fn test_one_row_per_input_in_order() {
    let geocoder = known_places();
    let locations = ["Alaska", "asdfqwer1234", "Alaska", "Museum of Modern Art"];

    let table = build_geo_table(&locations, &geocoder, &LoadOptions::default(), None).unwrap();

    let names: Vec<&str> = table.iter().map(|r| r.location.as_str()).collect();
    assert_eq!(names, locations);
    assert_eq!(geocoder.calls().len(), locations.len());
}

#[test]
fn test_valid_locations_match_geocoder() {
    let geocoder = known_places();
    let locations = ["Museum of Modern Art", "USS Alabama Battleship Memorial Park"];

    let table = build_geo_table(&locations, &geocoder, &LoadOptions::default(), None).unwrap();
    assert_eq!(table.len(), 2);

    let moma = table.find("Museum of Modern Art").unwrap();
    assert_close(moma.latitude.unwrap(), 40.7618552);
    assert_close(moma.longitude.unwrap(), -73.9782438);
    assert!(moma.kind.as_deref().unwrap().starts_with("museum"));

    let park = table.find("USS Alabama Battleship Memorial Park").unwrap();
    assert_close(park.latitude.unwrap(), 30.684373);
    assert_close(park.longitude.unwrap(), -88.015316);
    assert!(park.kind.as_deref().unwrap().starts_with("park"));
}

#[test]
fn test_invalid_and_failed_locations_are_fully_missing() {
    let geocoder = known_places();
    let table = build_geo_table(
        &["asdfqwer1234", "Burj Khalifa"],
        &geocoder,
        &LoadOptions::default(),
        None,
    )
    .unwrap();

    for record in &table {
        assert!(record.latitude.is_none(), "{} latitude", record.location);
        assert!(record.longitude.is_none(), "{} longitude", record.location);
        assert!(record.kind.is_none(), "{} type", record.location);
    }
}

#[test]
fn test_default_locations_run_to_completion() {
    let geocoder = known_places();
    let progress = LoadProgress::hidden(DEFAULT_LOCATIONS.len() as u64);

    let table = build_geo_table(
        &DEFAULT_LOCATIONS,
        &geocoder,
        &LoadOptions::default(),
        Some(&progress),
    )
    .unwrap();

    assert_eq!(table.len(), DEFAULT_LOCATIONS.len());
    assert_eq!(table.resolved_count(), 2);
}

#[test]
fn test_load_and_save_writes_csv_and_returns_table() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("geo_data.csv");
    let geocoder = known_places();

    let table = load_and_save(
        &["Alaska", "asdfqwer1234"],
        &geocoder,
        &LoadOptions::default(),
        &path,
        None,
    )
    .unwrap();

    let on_disk = table::load(&path).unwrap();
    assert_eq!(on_disk, table);
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("location,latitude,longitude,type\n"));
    assert!(text.contains("asdfqwer1234,,,"));
}

#[test]
fn test_missing_type_aborts_batch_without_writing() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("geo_data.csv");
    let geocoder = known_places().with_raw("Nowhere", 1.0, 2.0, json!({"class": "place"}));

    let err = load_and_save(
        &["Alaska", "Nowhere", "Museum of Modern Art"],
        &geocoder,
        &LoadOptions::default(),
        &path,
        None,
    )
    .unwrap_err();

    assert!(matches!(err, LoadError::MissingField { .. }));
    assert!(!path.exists());
    // The batch stops at the failing location.
    assert_eq!(geocoder.calls().len(), 2);
}

#[test]
fn test_missing_type_degrade_policy_continues_batch() {
    let geocoder = known_places().with_raw("Nowhere", 1.0, 2.0, json!({"class": "place"}));
    let options = LoadOptions {
        missing_type: MissingTypePolicy::Degrade,
        ..LoadOptions::default()
    };

    let table = build_geo_table(
        &["Alaska", "Nowhere", "Museum of Modern Art"],
        &geocoder,
        &options,
        None,
    )
    .unwrap();

    assert_eq!(table.len(), 3);
    assert!(!table.records[1].has_coordinates());
    assert!(table.records[1].kind.is_none());
    assert_eq!(table.resolved_count(), 2);
}
