use super::backend::{BackupBackend, StorageBackend};
use crate::error::{NotesError, Result};
use crate::model::NotesDocument;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const STORAGE_KEY: &str = "entity_notes";
pub const STORAGE_VERSION: u32 = 2;
pub const BACKUP_FILENAME: &str = "entity_notes_backup.json";
pub const MIGRATION_BACKUP_FILENAME: &str = "entity_notes_v1_backup.json";

/// On-disk wrapper around the payload. Owned by this backend; the store never
/// sees it.
#[derive(Debug, Serialize)]
struct Envelope<T> {
    version: u32,
    key: String,
    saved_at: DateTime<Utc>,
    data: T,
}

/// File-based storage rooted at one directory:
///
/// ```text
/// <root>/
/// ├── entity_notes                  # versioned notes file
/// ├── entity_notes_backup.json      # operator backup
/// ├── entity_notes_v1_backup.json   # safety copy taken before migrating v1 data
/// └── config.json
/// ```
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_file(&self) -> PathBuf {
        self.root.join(STORAGE_KEY)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(NotesError::Io)?;
        }
        Ok(())
    }

    /// Write through a uniquely named tmp file and rename over the target.
    fn write_atomic(&self, target: &Path, content: &str) -> Result<()> {
        self.ensure_dir()?;
        let stem = target
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("notes");
        let tmp_file = self.root.join(format!(".{}-{}.tmp", stem, Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(NotesError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, target) {
            let _ = fs::remove_file(&tmp_file);
            return Err(NotesError::Io(e));
        }
        Ok(())
    }
}

/// Strip the envelope if there is one. Bare JSON objects pass through as-is.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map)
            if map.get("version").is_some_and(Value::is_u64) && map.contains_key("data") =>
        {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

impl StorageBackend for FsBackend {
    fn load(&self) -> Result<Option<Value>> {
        let data_file = self.data_file();
        if !data_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&data_file).map_err(NotesError::Io)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            NotesError::Persistence(format!("{} is not valid JSON: {}", data_file.display(), e))
        })?;
        Ok(Some(unwrap_envelope(value)))
    }

    fn save(&self, document: &NotesDocument) -> Result<()> {
        let envelope = Envelope {
            version: STORAGE_VERSION,
            key: STORAGE_KEY.to_string(),
            saved_at: Utc::now(),
            data: document,
        };
        let content = serde_json::to_string_pretty(&envelope).map_err(NotesError::Serialization)?;
        self.write_atomic(&self.data_file(), &content)
    }

    fn location(&self) -> PathBuf {
        self.data_file()
    }
}

impl BackupBackend for FsBackend {
    fn write_backup(&self, document: &NotesDocument) -> Result<PathBuf> {
        let path = self.backup_path();
        let content = serde_json::to_string_pretty(document).map_err(NotesError::Serialization)?;
        self.write_atomic(&path, &content)?;
        Ok(path)
    }

    fn read_backup(&self) -> Result<Value> {
        let path = self.backup_path();
        if !path.exists() {
            return Err(NotesError::Restore(format!(
                "no backup found at {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| NotesError::Restore(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| NotesError::Restore(format!("{} is not valid JSON: {}", path.display(), e)))
    }

    fn write_migration_backup(&self, raw: &Value) -> Result<PathBuf> {
        let content = serde_json::to_string_pretty(raw).map_err(NotesError::Serialization)?;
        let fixed = self.migration_backup_path();

        let target = if fixed.exists() {
            let existing = fs::read_to_string(&fixed).map_err(NotesError::Io)?;
            let same = serde_json::from_str::<Value>(&existing)
                .map(|v| &v == raw)
                .unwrap_or(false);
            if same {
                return Ok(fixed);
            }
            self.root.join(format!(
                "entity_notes_v1_backup-{}-{}.json",
                Utc::now().format("%Y%m%dT%H%M%S"),
                Uuid::new_v4().simple()
            ))
        } else {
            fixed
        };

        self.write_atomic(&target, &content)?;
        Ok(target)
    }

    fn backup_path(&self) -> PathBuf {
        self.root.join(BACKUP_FILENAME)
    }

    fn migration_backup_path(&self) -> PathBuf {
        self.root.join(MIGRATION_BACKUP_FILENAME)
    }
}
