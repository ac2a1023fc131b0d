use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NotesError, Result};
use crate::model::Namespace;
use crate::store::{BackupBackend, NoteStore, StorageBackend};

/// Delete one note. Deleting a key that has no note is a `NotFound` error so
/// callers can surface it as such.
pub fn run<S: StorageBackend, K: BackupBackend>(
    store: &mut NoteStore<S, K>,
    namespace: Namespace,
    key: &str,
) -> Result<CmdResult> {
    if !store.delete(namespace, key)? {
        return Err(NotesError::NotFound(format!("{} {}", namespace, key.trim())));
    }

    let mut result = CmdResult::default().with_namespace(namespace);
    result.add_message(CmdMessage::success(format!("Note deleted: {}", key.trim())));
    Ok(result)
}
