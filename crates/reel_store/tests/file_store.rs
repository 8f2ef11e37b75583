use std::fs;

use reel_store::{ensure_store_dir, FileStore, KeyValueStore, SearchHistory, StoreError};
use tempfile::TempDir;

#[test]
fn creates_missing_store_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("store");
    assert!(!new_dir.exists());
    ensure_store_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn set_replaces_existing_value() {
    let temp = TempDir::new().unwrap();
    let mut store = FileStore::open(temp.path()).unwrap();

    assert_eq!(store.get("theme").unwrap(), None);
    store.set("theme", "light").unwrap();
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
    store.set("theme", "dark").unwrap();
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(
        fs::read_to_string(temp.path().join("theme.json")).unwrap(),
        "dark"
    );
}

#[test]
fn failed_set_leaves_target_and_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let mut store = FileStore::open(temp.path()).unwrap();
    store.set("theme", "light").unwrap();
    store.set("theme", "dark").unwrap();

    let blocked = temp.path().join("blocked.json");
    fs::create_dir(&blocked).unwrap();
    fs::write(blocked.join("keep"), "x").unwrap();
    assert!(store.set("blocked", "value").is_err());
    assert!(blocked.join("keep").is_file());

    let mut names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["blocked.json", "theme.json"]);
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn remove_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let mut store = FileStore::open(temp.path()).unwrap();
    store.set("k", "v").unwrap();
    store.remove("k").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn path_like_keys_are_rejected() {
    let temp = TempDir::new().unwrap();
    let mut store = FileStore::open(temp.path()).unwrap();
    for key in ["", "../escape", ".hidden", "a/b"] {
        assert!(matches!(
            store.set(key, "x"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}

#[test]
fn store_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    assert!(matches!(
        FileStore::open(&file_path),
        Err(StoreError::StoreDir(_))
    ));
}

#[test]
fn history_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let history = SearchHistory::new("videoSearchHistory", 5);
    {
        let mut store = FileStore::open(temp.path()).unwrap();
        history.record(&mut store, "persisted", 1_700_000_000_000);
    }
    let store = FileStore::open(temp.path()).unwrap();
    let loaded = history.load(&store);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].text, "persisted");
}
