//! Filesystem tests for `JsonFileStore`. Each test works in its own temp dir.

use std::collections::BTreeSet;

use jobwatch_store::{BaselineStore, JsonFileStore, StoreError};

fn titles(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[tokio::test]
async fn missing_file_loads_as_empty_baseline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());
    let loaded = store.load("Acme").await.expect("first run is not an error");
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn save_then_load_reproduces_the_set() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());
    let saved = titles(&["Manager", "Engineer", "Recruiter, \"Tech\""]);

    store.save("Meta AI", &saved).await.expect("save");
    assert_eq!(store.load("Meta AI").await.expect("load"), saved);
}

#[tokio::test]
async fn save_replaces_previous_contents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());

    store.save("Acme", &titles(&["A", "B"])).await.expect("save");
    store.save("Acme", &titles(&["A"])).await.expect("save");
    assert_eq!(store.load("Acme").await.expect("load"), titles(&["A"]));
}

#[tokio::test]
async fn file_is_named_by_slug_and_holds_sorted_array() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());

    store
        .save("Meta AI", &titles(&["Zeta", "Alpha"]))
        .await
        .expect("save");

    let path = dir.path().join("meta-ai.json");
    assert_eq!(store.path_for("Meta AI"), path);
    let raw = std::fs::read_to_string(&path).expect("read");
    let parsed: Vec<String> = serde_json::from_str(&raw).expect("json array");
    assert_eq!(parsed, vec!["Alpha", "Zeta"]);
    assert!(!dir.path().join("meta-ai.json.tmp").exists());
}

#[tokio::test]
async fn save_creates_missing_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("data").join("baselines");
    let store = JsonFileStore::new(&nested);

    store.save("Acme", &titles(&["A"])).await.expect("save");
    assert!(nested.join("acme.json").exists());
}

#[tokio::test]
async fn corrupt_file_is_an_error_and_left_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());
    let path = store.path_for("Acme");
    std::fs::write(&path, "{not json").expect("write");

    let err = store.load("Acme").await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }), "got: {err:?}");
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "{not json");
}

#[tokio::test]
async fn baselines_are_kept_per_site() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());

    store.save("Acme", &titles(&["A"])).await.expect("save");
    store.save("Globex", &titles(&["G"])).await.expect("save");
    assert_eq!(store.load("Acme").await.expect("load"), titles(&["A"]));
    assert_eq!(store.load("Globex").await.expect("load"), titles(&["G"]));
}

#[tokio::test]
async fn clear_removes_baseline_and_reports_absence() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());

    assert!(!store.clear("Acme").await.expect("clear"));
    store.save("Acme", &titles(&["A"])).await.expect("save");
    assert!(store.clear("Acme").await.expect("clear"));
    assert!(store.load("Acme").await.expect("load").is_empty());
}
