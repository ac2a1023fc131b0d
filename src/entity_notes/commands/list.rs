use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Namespace;
use crate::store::{BackupBackend, NoteStore, StorageBackend};

pub fn run<S: StorageBackend, K: BackupBackend>(
    store: &NoteStore<S, K>,
    namespace: Namespace,
) -> Result<CmdResult> {
    let notes = store.list(namespace);
    let mut result = CmdResult::default().with_namespace(namespace);
    if notes.is_empty() {
        result.add_message(CmdMessage::info(format!("No {} notes.", namespace)));
    }
    Ok(result.with_listed_notes(notes))
}
