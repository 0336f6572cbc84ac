use std::fs;

use meter_application::{MeterApp, MeterOptions, ReconcileOutcome};
use meter_core::history::SelectedId;
use meter_core::selection::EncounterSelection;
use meter_core::store::StateStore;
use serde_json::json;
use tempfile::TempDir;

fn options(dir: &TempDir) -> MeterOptions {
    MeterOptions {
        base_dir: Some(dir.path().to_path_buf()),
        init_tracing: false,
    }
}

fn write_store(dir: &TempDir, key: &str, value: serde_json::Value) {
    let stores = dir.path().join("stores");
    fs::create_dir_all(&stores).unwrap();
    fs::write(stores.join(format!("{}.json", key)), value.to_string()).unwrap();
}

#[tokio::test]
async fn adopts_history_persisted_by_previous_run() {
    let dir = TempDir::new().unwrap();
    write_store(
        &dir,
        "encounterHistory",
        json!({
            "encounters": [
                { "id": "1700000000500-1abcde", "timestamp": 1700000000500i64, "data": { "dps": 2 } },
                { "id": "1700000000000-0fghij", "timestamp": 1700000000000i64, "data": { "dps": 1 } }
            ],
            "selectedId": "1700000000000-0fghij"
        }),
    );

    let mut app = MeterApp::bootstrap(options(&dir)).unwrap();
    let outcome = app.wait_reconciled().await.unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Adopted { .. }));
    let encounters = app.history.encounters();
    assert_eq!(encounters.len(), 2);
    assert_eq!(encounters[0].data, json!({ "dps": 2 }));
    assert_eq!(
        app.history.selected_encounter_id(),
        SelectedId::Encounter("1700000000000-0fghij".to_string())
    );
    assert_eq!(app.wait_reconciled().await, None);
}

#[tokio::test]
async fn push_before_load_keeps_persisted_history() {
    let dir = TempDir::new().unwrap();
    write_store(
        &dir,
        "encounterHistory",
        json!({
            "encounters": [
                { "id": "1700000000500-1abcde", "timestamp": 1700000000500i64, "data": { "dps": 2 } },
                { "id": "1700000000000-0fghij", "timestamp": 1700000000000i64, "data": { "dps": 1 } }
            ],
            "selectedId": "current"
        }),
    );

    let mut app = MeterApp::bootstrap(options(&dir)).unwrap();
    let fresh = app.history.push_encounter(json!({ "dps": 3 })).unwrap();
    app.wait_reconciled().await;
    app.history_store.save().await.unwrap();

    let ids: Vec<String> = app.history.encounters().into_iter().map(|e| e.id).collect();
    assert_eq!(
        ids,
        vec![
            fresh,
            "1700000000500-1abcde".to_string(),
            "1700000000000-0fghij".to_string()
        ]
    );

    let on_disk: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("stores/encounterHistory.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(on_disk["encounters"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn pushed_encounters_survive_restart() {
    let dir = TempDir::new().unwrap();

    let mut app = MeterApp::bootstrap(options(&dir)).unwrap();
    assert_eq!(app.wait_reconciled().await, Some(ReconcileOutcome::GaveUp));

    let first = app.history.push_encounter(json!({ "boss": "Tina" })).unwrap();
    let second = app.history.push_encounter(json!({ "boss": "Goblin King" })).unwrap();
    app.history.select_encounter(first.as_str());
    app.history_store.save().await.unwrap();
    drop(app);

    let mut app = MeterApp::bootstrap(options(&dir)).unwrap();
    app.wait_reconciled().await;

    let ids: Vec<String> = app.history.encounters().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![second, first.clone()]);
    assert_eq!(app.history.selected_encounter_id(), SelectedId::Encounter(first));
}

#[tokio::test]
async fn history_limit_comes_from_settings() {
    let dir = TempDir::new().unwrap();
    write_store(&dir, "history", json!({ "maxEncounters": 2 }));

    let mut app = MeterApp::bootstrap(options(&dir)).unwrap();
    app.wait_reconciled().await;
    let mut loaded = app.settings.history.loaded().unwrap();
    loaded.wait_for(|done| *done).await.unwrap();

    for n in 0..3 {
        app.history.push_encounter(json!(n)).unwrap();
    }

    let encounters = app.history.encounters();
    assert_eq!(encounters.len(), 2);
    assert_eq!(encounters[0].data, json!(2));
}

#[tokio::test]
async fn corrupt_selection_falls_back_to_live() {
    let dir = TempDir::new().unwrap();
    let stores = dir.path().join("stores");
    fs::create_dir_all(&stores).unwrap();
    fs::write(stores.join("selectedEncounter.json"), "{ not json").unwrap();

    let app = MeterApp::bootstrap(options(&dir)).unwrap();

    assert_eq!(app.selection.current(), EncounterSelection::Live);
    app.selection.select_historical(5);
    assert_eq!(app.selection.current().encounter_id(), Some(5));
}

#[tokio::test]
async fn writes_default_config_on_first_run() {
    let dir = TempDir::new().unwrap();

    let app = MeterApp::bootstrap(options(&dir)).unwrap();

    assert!(dir.path().join("config.toml").exists());
    assert_eq!(app.config.history.max_poll_attempts, 10);
}
