use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Namespace;
use crate::notify::ObjectRemoved;
use crate::store::{BackupBackend, NoteStore, StorageBackend};

/// Feed an "object removed" signal to the store, as the host would when an
/// entity or device is deleted.
pub fn run<S: StorageBackend, K: BackupBackend>(
    store: &mut NoteStore<S, K>,
    namespace: Namespace,
    key: &str,
) -> Result<CmdResult> {
    let had_note = !store.get(namespace, key).is_empty();
    store.handle_removal(&ObjectRemoved::new(namespace, key.trim()));
    let has_note = !store.get(namespace, key).is_empty();

    let mut result = CmdResult::default().with_namespace(namespace);
    let message = match (had_note, has_note) {
        (false, _) => CmdMessage::info(format!("No {} note for {}", namespace, key.trim())),
        (true, false) => CmdMessage::success(format!("Note removed: {}", key.trim())),
        (true, true) => CmdMessage::warning(format!(
            "Note kept: removal deletion is disabled for {} notes",
            namespace
        )),
    };
    result.add_message(message);
    Ok(result)
}
