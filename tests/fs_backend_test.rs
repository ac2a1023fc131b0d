use entity_notes::migrate::MigrationOutcome;
use entity_notes::store::backend::{BackupBackend, StorageBackend};
use entity_notes::store::fs_backend::{MIGRATION_BACKUP_FILENAME, STORAGE_KEY};
use entity_notes::{FsBackend, Namespace, NoteStore, NotesConfig, NotesError};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn open(dir: &Path) -> NoteStore<FsBackend, FsBackend> {
    NoteStore::open(
        FsBackend::new(dir.to_path_buf()),
        FsBackend::new(dir.to_path_buf()),
        NotesConfig::default(),
    )
    .unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn assert_no_tmp_files(dir: &Path) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_notes_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(dir.path());
        store.set(Namespace::Entity, "light.kitchen", "  LED strip  ").unwrap();
        store.set(Namespace::Device, "dev-1", "attic").unwrap();
    }

    let store = open(dir.path());
    assert_eq!(store.get(Namespace::Entity, "light.kitchen"), "LED strip");
    assert_eq!(store.get(Namespace::Device, "dev-1"), "attic");
    assert_eq!(store.migration_outcome(), &MigrationOutcome::Current);
    assert_no_tmp_files(dir.path());
}

#[test]
fn test_legacy_file_is_migrated_with_safety_copy() {
    let dir = TempDir::new().unwrap();
    let legacy = json!({"light.x": "old note", "switch.y": "  second  "});
    fs::write(
        dir.path().join(STORAGE_KEY),
        serde_json::to_string(&json!({"version": 1, "key": "entity_notes", "data": legacy}))
            .unwrap(),
    )
    .unwrap();

    let store = open(dir.path());

    assert_eq!(store.get(Namespace::Entity, "light.x"), "old note");
    assert!(store.list(Namespace::Device).is_empty());
    assert!(matches!(
        store.migration_outcome(),
        MigrationOutcome::Upgraded { from_version: 1, .. }
    ));

    let safety = read_json(&dir.path().join(MIGRATION_BACKUP_FILENAME));
    assert_eq!(safety, legacy);

    let on_disk = read_json(&dir.path().join(STORAGE_KEY));
    assert_eq!(on_disk["version"], json!(2));
    assert_eq!(on_disk["data"]["entity_notes"]["light.x"], json!("old note"));
    assert_eq!(on_disk["data"]["device_notes"], json!({}));
}

#[test]
fn test_failed_safety_copy_leaves_legacy_file_untouched() {
    let dir = TempDir::new().unwrap();
    let notes_file = dir.path().join(STORAGE_KEY);
    fs::write(&notes_file, r#"{"light.x": "hi"}"#).unwrap();
    // A directory where the safety copy should go cannot be written as a file.
    fs::create_dir(dir.path().join(MIGRATION_BACKUP_FILENAME)).unwrap();
    let before = fs::read(&notes_file).unwrap();

    let result = NoteStore::open(
        FsBackend::new(dir.path().to_path_buf()),
        FsBackend::new(dir.path().to_path_buf()),
        NotesConfig::default(),
    );

    assert!(matches!(result, Err(NotesError::MigrationBackup { .. })));
    assert_eq!(fs::read(&notes_file).unwrap(), before);
    assert_no_tmp_files(dir.path());
}

#[test]
fn test_migrated_file_is_not_migrated_again() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(STORAGE_KEY),
        r#"{"version": 1, "key": "entity_notes", "data": {"a": "1"}}"#,
    )
    .unwrap();

    drop(open(dir.path()));
    let store = open(dir.path());
    assert_eq!(store.migration_outcome(), &MigrationOutcome::Current);
    assert_eq!(store.get(Namespace::Entity, "a"), "1");
}

#[test]
fn test_backup_and_restore_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut store = open(dir.path());
    store.set(Namespace::Entity, "a", "one").unwrap();
    store.set(Namespace::Device, "d", "two").unwrap();

    let path = store.backup().unwrap();
    assert_eq!(path, store.backups().backup_path());
    let backup = read_json(&path);
    assert_eq!(backup["entity_notes"]["a"], json!("one"));
    assert_eq!(backup["device_notes"]["d"], json!("two"));

    store.delete(Namespace::Entity, "a").unwrap();
    store.set(Namespace::Entity, "b", "kept").unwrap();

    let report = store.restore().unwrap();
    assert_eq!(report.total(), 2);
    assert_eq!(store.get(Namespace::Entity, "a"), "one");
    assert_eq!(store.get(Namespace::Entity, "b"), "kept");

    let reopened = open(dir.path());
    assert_eq!(reopened.get(Namespace::Entity, "a"), "one");
    assert_no_tmp_files(dir.path());
}

#[test]
fn test_restore_without_backup_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let mut store = open(dir.path());
    store.set(Namespace::Entity, "a", "one").unwrap();

    assert!(matches!(store.restore(), Err(NotesError::Restore(_))));
    assert_eq!(store.get(Namespace::Entity, "a"), "one");
}

#[test]
fn test_corrupt_notes_file_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(STORAGE_KEY), "{not json").unwrap();

    let backend = FsBackend::new(dir.path().to_path_buf());
    assert!(matches!(backend.load(), Err(NotesError::Persistence(_))));
}
