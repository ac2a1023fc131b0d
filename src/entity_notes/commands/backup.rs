use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{BackupBackend, NoteStore, StorageBackend};

pub fn run<S: StorageBackend, K: BackupBackend>(store: &NoteStore<S, K>) -> Result<CmdResult> {
    let path = store.backup()?;
    let doc = store.document();

    let mut result = CmdResult::default().with_paths(vec![path.clone()]);
    result.add_message(CmdMessage::success(format!(
        "Backed up {} entity and {} device note(s) to {}",
        doc.entity_notes.len(),
        doc.device_notes.len(),
        path.display()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mem_store;
    use crate::model::Namespace;

    #[test]
    fn writes_backup_and_reports_path() {
        let mut store = mem_store();
        store.set(Namespace::Entity, "a", "1").unwrap();

        let result = run(&store).unwrap();
        assert_eq!(result.paths, vec![store.backups().backup_path()]);
        assert!(result.messages[0].content.contains("1 entity and 0 device"));
        assert!(store.backups().raw_backup().is_some());
    }
}
