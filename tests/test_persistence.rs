use topdown_shooter::error::PersistenceError;
use topdown_shooter::persistence::*;

#[test]
fn memory_store_defaults_to_nothing() {
    let store = MemoryStore::new();
    assert_eq!(store.get_int(MAX_SCORE_KEY), None);
    assert_eq!(load_max_score(&store), 0);
}

#[test]
fn memory_store_overwrites() {
    let mut store = MemoryStore::new();
    store.set_int(MAX_SCORE_KEY, 10).unwrap();
    store.set_int(MAX_SCORE_KEY, 30).unwrap();
    assert_eq!(store.get_int(MAX_SCORE_KEY), Some(30));
    assert_eq!(load_max_score(&store), 30);
}

#[test]
fn out_of_range_max_score_reads_as_zero() {
    let mut store = MemoryStore::new();
    store.set_int(MAX_SCORE_KEY, -5).unwrap();
    assert_eq!(load_max_score(&store), 0);
}

#[test]
fn json_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("save.json")).unwrap();
    assert_eq!(store.get_int(MAX_SCORE_KEY), None);
}

#[test]
fn json_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    store.set_int(MAX_SCORE_KEY, 150).unwrap();
    store.set_int("Other", 3).unwrap();

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get_int(MAX_SCORE_KEY), Some(150));
    assert_eq!(reopened.get_int("Other"), Some(3));
    assert_eq!(reopened.path(), path.as_path());
}

#[test]
fn json_store_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    std::fs::write(&path, "not json").unwrap();

    let err = JsonFileStore::open(&path).unwrap_err();
    assert!(matches!(err, PersistenceError::Corrupt { .. }));
}

#[test]
fn json_store_reports_write_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("save.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    let err = store.set_int(MAX_SCORE_KEY, 1).unwrap_err();
    assert!(matches!(err, PersistenceError::Write { .. }));
}

#[test]
fn json_store_reports_read_failures() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonFileStore::open(dir.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::Read { .. }));
}
