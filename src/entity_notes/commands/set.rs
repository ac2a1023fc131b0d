use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Namespace, NoteCollection};
use crate::store::{BackupBackend, NoteStore, StorageBackend};

pub fn run<S: StorageBackend, K: BackupBackend>(
    store: &mut NoteStore<S, K>,
    namespace: Namespace,
    key: &str,
    body: &str,
) -> Result<CmdResult> {
    let stored = store.set(namespace, key, body)?;
    let key = key.trim();
    let mut result = CmdResult::default().with_namespace(namespace);

    if stored.is_empty() {
        result.add_message(CmdMessage::success(format!("Note removed: {}", key)));
        return Ok(result);
    }

    let submitted = body.trim().chars().count();
    let kept = stored.chars().count();
    if kept < submitted {
        result.add_message(CmdMessage::warning(format!(
            "Note truncated to {} of {} characters",
            kept, submitted
        )));
    }
    result.add_message(CmdMessage::success(format!("Note saved: {}", key)));

    let mut listed = NoteCollection::new();
    listed.insert(key.to_string(), stored);
    Ok(result.with_listed_notes(listed))
}
