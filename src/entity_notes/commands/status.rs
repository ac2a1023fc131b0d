use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::migrate::MigrationOutcome;
use crate::store::{BackupBackend, NoteStore, StorageBackend};

pub fn run<S: StorageBackend, K: BackupBackend>(store: &NoteStore<S, K>) -> Result<CmdResult> {
    let doc = store.document();
    let config = store.config();
    let mut result = CmdResult::default().with_paths(vec![
        store.storage().location(),
        store.backups().backup_path(),
    ]);

    result.add_message(CmdMessage::info(format!(
        "Notes file: {}",
        store.storage().location().display()
    )));
    result.add_message(CmdMessage::info(format!(
        "Entity notes: {}",
        doc.entity_notes.len()
    )));
    let device_line = format!("Device notes: {}", doc.device_notes.len());
    if config.enable_device_notes {
        result.add_message(CmdMessage::info(device_line));
    } else {
        result.add_message(CmdMessage::warning(format!("{} (read-only)", device_line)));
    }
    result.add_message(CmdMessage::info(format!(
        "Backup file: {}",
        store.backups().backup_path().display()
    )));

    if let MigrationOutcome::Upgraded {
        from_version,
        backup_path,
    } = store.migration_outcome()
    {
        result.add_message(CmdMessage::warning(format!(
            "Migrated from schema v{}; original kept at {}",
            from_version,
            backup_path.display()
        )));
    }

    Ok(result.with_config(config.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mem_store_with;
    use crate::commands::MessageLevel;
    use crate::config::NotesConfig;
    use crate::store::MemBackend;
    use serde_json::json;

    #[test]
    fn reports_counts_and_paths() {
        let mut store = mem_store_with(NotesConfig::default());
        store
            .set(crate::model::Namespace::Entity, "a", "1")
            .unwrap();

        let result = run(&store).unwrap();
        assert_eq!(result.paths.len(), 2);
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "Entity notes: 1"));
    }

    #[test]
    fn mentions_migration_and_read_only_devices() {
        let config = NotesConfig {
            enable_device_notes: false,
            ..Default::default()
        };
        let store = NoteStore::open(
            MemBackend::with_data(json!({"light.x": "hi"})),
            MemBackend::new(),
            config,
        )
        .unwrap();

        let result = run(&store).unwrap();
        let warnings: Vec<_> = result
            .messages
            .iter()
            .filter(|m| m.level == MessageLevel::Warning)
            .map(|m| m.content.clone())
            .collect();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("read-only")));
        assert!(warnings.iter().any(|w| w.contains("schema v1")));
    }
}
