use crate::error::Result;
use crate::model::NotesDocument;
use serde_json::Value;
use std::path::PathBuf;

/// Abstract interface for the versioned notes file.
///
/// `load` hands back the raw payload without interpreting its schema; the
/// migrator decides what shape it is. `save` always writes the current shape.
pub trait StorageBackend {
    /// Load the raw payload, or `None` if nothing has been stored yet.
    fn load(&self) -> Result<Option<Value>>;

    /// Persist both namespaces in one write.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save(&self, document: &NotesDocument) -> Result<()>;

    /// Where the data lives, for diagnostics.
    fn location(&self) -> PathBuf;
}

/// Abstract interface for the operator-visible backup files.
///
/// Independent of [`StorageBackend`]: backups are plain JSON with no envelope.
pub trait BackupBackend {
    /// Write the backup document, replacing any previous backup.
    fn write_backup(&self, document: &NotesDocument) -> Result<PathBuf>;

    /// Read the backup document as raw JSON.
    /// A missing backup is an error, not `None`: there is nothing to restore.
    fn read_backup(&self) -> Result<Value>;

    /// Write the pre-migration safety copy of a legacy payload.
    /// Never overwrites an earlier copy with different content.
    fn write_migration_backup(&self, raw: &Value) -> Result<PathBuf>;

    /// Path of the backup written by [`BackupBackend::write_backup`].
    fn backup_path(&self) -> PathBuf;

    /// Fixed location of the pre-migration safety copy.
    fn migration_backup_path(&self) -> PathBuf;
}
