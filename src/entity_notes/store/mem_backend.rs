use super::backend::{BackupBackend, StorageBackend};
use crate::error::{NotesError, Result};
use crate::model::NotesDocument;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;

/// In-memory storage and backup backend for testing.
///
/// Uses `RefCell` for interior mutability since the store is single-threaded.
/// Holds raw JSON so tests can seed legacy shapes exactly as they would sit
/// on disk.
#[derive(Default)]
pub struct MemBackend {
    data: RefCell<Option<Value>>,
    backup: RefCell<Option<Value>>,
    migration_backups: RefCell<Vec<Value>>,
    saves: Cell<usize>,
    simulate_write_error: Cell<bool>,
    simulate_backup_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing raw payload, as if it had been loaded from disk.
    pub fn with_data(raw: Value) -> Self {
        let backend = Self::default();
        *backend.data.borrow_mut() = Some(raw);
        backend
    }

    /// Enable save error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Enable backup write error simulation (covers migration backups too).
    pub fn set_simulate_backup_error(&self, simulate: bool) {
        self.simulate_backup_error.set(simulate);
    }

    /// Replace the stored backup, e.g. with a legacy flat document.
    pub fn set_backup(&self, raw: Value) {
        *self.backup.borrow_mut() = Some(raw);
    }

    pub fn raw_data(&self) -> Option<Value> {
        self.data.borrow().clone()
    }

    pub fn raw_backup(&self) -> Option<Value> {
        self.backup.borrow().clone()
    }

    pub fn migration_backups(&self) -> Vec<Value> {
        self.migration_backups.borrow().clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl StorageBackend for MemBackend {
    fn load(&self) -> Result<Option<Value>> {
        Ok(self.data.borrow().clone())
    }

    fn save(&self, document: &NotesDocument) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(NotesError::Persistence("Simulated write error".to_string()));
        }
        let value = serde_json::to_value(document).map_err(NotesError::Serialization)?;
        *self.data.borrow_mut() = Some(value);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://entity_notes")
    }
}

impl BackupBackend for MemBackend {
    fn write_backup(&self, document: &NotesDocument) -> Result<PathBuf> {
        if self.simulate_backup_error.get() {
            return Err(NotesError::Persistence(
                "Simulated backup write error".to_string(),
            ));
        }
        let value = serde_json::to_value(document).map_err(NotesError::Serialization)?;
        *self.backup.borrow_mut() = Some(value);
        Ok(self.backup_path())
    }

    fn read_backup(&self) -> Result<Value> {
        self.backup
            .borrow()
            .clone()
            .ok_or_else(|| NotesError::Restore("no backup found".to_string()))
    }

    fn write_migration_backup(&self, raw: &Value) -> Result<PathBuf> {
        if self.simulate_backup_error.get() {
            return Err(NotesError::Persistence(
                "Simulated backup write error".to_string(),
            ));
        }
        let mut backups = self.migration_backups.borrow_mut();
        if backups.last() != Some(raw) {
            backups.push(raw.clone());
        }
        Ok(PathBuf::from(format!(
            "memory://entity_notes_v1_backup-{}.json",
            backups.len()
        )))
    }

    fn backup_path(&self) -> PathBuf {
        PathBuf::from("memory://entity_notes_backup.json")
    }

    fn migration_backup_path(&self) -> PathBuf {
        PathBuf::from("memory://entity_notes_v1_backup.json")
    }
}
