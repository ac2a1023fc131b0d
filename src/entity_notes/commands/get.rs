use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Namespace, NoteCollection};
use crate::store::{BackupBackend, NoteStore, StorageBackend};

pub fn run<S: StorageBackend, K: BackupBackend>(
    store: &NoteStore<S, K>,
    namespace: Namespace,
    key: &str,
) -> Result<CmdResult> {
    let note = store.get(namespace, key);
    let mut result = CmdResult::default().with_namespace(namespace);

    if note.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No {} note for {}",
            namespace,
            key.trim()
        )));
    } else {
        let mut listed = NoteCollection::new();
        listed.insert(key.trim().to_string(), note);
        result = result.with_listed_notes(listed);
    }

    Ok(result)
}
