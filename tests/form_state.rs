use std::fs;

use wireless_calc::request::FormValues;
use wireless_calc::scenario::Scenario;
use wireless_calc::store::{storage_key, FileStore, FormStateStore, KeyValueStore};

fn values(pairs: &[(&str, &str)]) -> FormValues {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn snapshots_survive_a_new_store_instance() {
    let dir = tempfile::tempdir().unwrap();
    let saved = values(&[("subcarrier_spacing", "15000"), ("modulation_order", "64")]);

    let mut store = FormStateStore::new(FileStore::new(dir.path().join("state")));
    store.save(Scenario::Ofdm, &saved).unwrap();

    let reopened = FormStateStore::new(FileStore::new(dir.path().join("state")));
    assert_eq!(reopened.load(Scenario::Ofdm), Some(saved));
    assert_eq!(reopened.load(Scenario::Cellular), None);
}

#[test]
fn file_is_named_after_the_storage_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FormStateStore::new(FileStore::new(dir.path()));
    store.save(Scenario::LinkBudget, &values(&[("distance_km", "2")])).unwrap();

    let path = dir.path().join(format!("{}.json", storage_key(Scenario::LinkBudget)));
    assert!(path.ends_with("wireless-app-link-budget.json"));
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({"distance_km": "2"}));
}

#[test]
fn later_save_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FormStateStore::new(FileStore::new(dir.path()));
    store.save(Scenario::Cellular, &values(&[("coverage_area_km2", "10")])).unwrap();
    store.save(Scenario::Cellular, &values(&[("coverage_area_km2", "20")])).unwrap();
    assert_eq!(store.load(Scenario::Cellular), Some(values(&[("coverage_area_km2", "20")])));
}

#[test]
fn malformed_snapshot_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = FileStore::new(dir.path());
    backend.set(&storage_key(Scenario::WirelessComm), "{not json").unwrap();

    let store = FormStateStore::new(backend);
    assert_eq!(store.load(Scenario::WirelessComm), None);
}
