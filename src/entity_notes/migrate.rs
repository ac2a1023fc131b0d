//! # Schema Migration
//!
//! The notes payload has had two shapes:
//!
//! - **v1**: a flat `{ key: note }` map holding entity notes only.
//! - **v2**: `{ "entity_notes": {...}, "device_notes": {...} }`.
//!
//! The `entity_notes` key is the only discriminator. Anything that is a JSON
//! object without it is v1.
//!
//! Upgrading v1 is destructive (the next save rewrites the file in v2 shape),
//! so a safety copy of the raw v1 payload is written through the
//! [`BackupBackend`] first. If that copy cannot be written the migration
//! aborts and nothing else happens.
//!
//! Migration is a pure function of its input apart from that safety copy.
//! Persisting the upgraded document is the caller's job
//! (see [`NoteStore::open`](crate::store::note_store::NoteStore::open)).

use crate::error::{NotesError, Result};
use crate::model::{NoteCollection, NotesDocument};
use crate::store::backend::BackupBackend;
use log::{info, warn};
use serde_json::{Map, Value};
use std::path::PathBuf;

const V2_MARKER: &str = "entity_notes";
const DEVICE_KEY: &str = "device_notes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Nothing stored yet.
    Fresh,
    /// Already in the current shape.
    Current,
    /// Upgraded from a legacy shape; the safety copy is at `backup_path`.
    Upgraded { from_version: u32, backup_path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Migration {
    pub document: NotesDocument,
    pub outcome: MigrationOutcome,
}

impl Migration {
    /// Whether the caller must persist `document` before using it.
    pub fn needs_save(&self) -> bool {
        matches!(self.outcome, MigrationOutcome::Upgraded { .. })
    }
}

/// Detect the payload's schema version and bring it to the current shape.
pub fn migrate<K: BackupBackend>(raw: Option<Value>, backups: &K) -> Result<Migration> {
    let map = match raw {
        None | Some(Value::Null) => {
            return Ok(Migration {
                document: NotesDocument::default(),
                outcome: MigrationOutcome::Fresh,
            })
        }
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(NotesError::Persistence(format!(
                "unrecognized notes payload: expected a JSON object, found {}",
                json_kind(&other)
            )))
        }
    };

    if map.contains_key(V2_MARKER) {
        let entity_notes = collection_from(map.get(V2_MARKER), V2_MARKER)?;
        let device_notes = collection_from(map.get(DEVICE_KEY), DEVICE_KEY)?;
        return Ok(Migration {
            document: NotesDocument::new(entity_notes, device_notes),
            outcome: MigrationOutcome::Current,
        });
    }

    let raw = Value::Object(map);
    let backup_path = backups
        .write_migration_backup(&raw)
        .map_err(|e| NotesError::MigrationBackup {
            path: backups.migration_backup_path(),
            source: Box::new(e),
        })?;
    info!(
        "legacy v1 notes found; safety copy written to {}",
        backup_path.display()
    );

    let entity_notes = collection_from(Some(&raw), "v1 payload")?;
    info!(
        "migrated {} entity note(s) from schema v1 to v2",
        entity_notes.len()
    );

    Ok(Migration {
        document: NotesDocument::new(entity_notes, NoteCollection::new()),
        outcome: MigrationOutcome::Upgraded {
            from_version: 1,
            backup_path,
        },
    })
}

/// Copy a JSON object of notes into a collection, dropping entries that would
/// break the non-empty invariant. Keys are trimmed; on a collision the first
/// entry wins.
pub(crate) fn collection_from(value: Option<&Value>, label: &str) -> Result<NoteCollection> {
    let map: &Map<String, Value> = match value {
        None | Some(Value::Null) => return Ok(NoteCollection::new()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(NotesError::Persistence(format!(
                "{} must be a JSON object, found {}",
                label,
                json_kind(other)
            )))
        }
    };

    let mut notes = NoteCollection::new();
    for (key, note) in map {
        match note {
            Value::String(body) if !key.trim().is_empty() && !body.trim().is_empty() => {
                let trimmed = key.trim();
                if notes.contains_key(trimmed) {
                    warn!("dropping duplicate note for `{}` in {}", key, label);
                    continue;
                }
                notes.insert(trimmed.to_string(), body.clone());
            }
            Value::String(_) => warn!("dropping empty note for `{}` in {}", key, label),
            other => warn!(
                "dropping non-text note for `{}` in {} ({})",
                key,
                label,
                json_kind(other)
            ),
        }
    }
    Ok(notes)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use serde_json::json;

    #[test]
    fn absent_payload_is_fresh_and_empty() {
        let backups = MemBackend::new();
        let migration = migrate(None, &backups).unwrap();
        assert_eq!(migration.outcome, MigrationOutcome::Fresh);
        assert!(migration.document.is_empty());
        assert!(!migration.needs_save());
        assert!(backups.migration_backups().is_empty());
    }

    #[test]
    fn v2_payload_is_left_alone() {
        let backups = MemBackend::new();
        let raw = json!({
            "entity_notes": {"light.x": "hi"},
            "device_notes": {"abc123": "router"}
        });

        let migration = migrate(Some(raw), &backups).unwrap();
        assert_eq!(migration.outcome, MigrationOutcome::Current);
        assert!(!migration.needs_save());
        assert_eq!(migration.document.entity_notes["light.x"], "hi");
        assert_eq!(migration.document.device_notes["abc123"], "router");
        assert!(backups.migration_backups().is_empty());
    }

    #[test]
    fn v2_payload_without_device_notes_defaults_to_empty() {
        let backups = MemBackend::new();
        let migration = migrate(Some(json!({"entity_notes": {"a": "1"}})), &backups).unwrap();
        assert_eq!(migration.outcome, MigrationOutcome::Current);
        assert!(migration.document.device_notes.is_empty());
    }

    #[test]
    fn migrating_v2_twice_is_byte_identical() {
        let backups = MemBackend::new();
        let raw = json!({
            "entity_notes": {"light.x": "hi", "sensor.y": "north wall"},
            "device_notes": {"d1": "attic"}
        });

        let first = migrate(Some(raw), &backups).unwrap().document;
        let again = migrate(Some(serde_json::to_value(&first).unwrap()), &backups)
            .unwrap()
            .document;

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&again).unwrap()
        );
    }

    #[test]
    fn v1_payload_is_backed_up_then_upgraded() {
        let backups = MemBackend::new();
        let raw = json!({"light.x": "hi"});

        let migration = migrate(Some(raw.clone()), &backups).unwrap();
        assert!(migration.needs_save());
        assert!(matches!(
            migration.outcome,
            MigrationOutcome::Upgraded { from_version: 1, .. }
        ));
        assert_eq!(migration.document.entity_notes["light.x"], "hi");
        assert!(migration.document.device_notes.is_empty());
        assert_eq!(backups.migration_backups(), vec![raw]);
    }

    #[test]
    fn v1_migration_aborts_when_backup_fails() {
        let backups = MemBackend::new();
        backups.set_simulate_backup_error(true);

        let result = migrate(Some(json!({"light.x": "hi"})), &backups);
        assert!(matches!(result, Err(NotesError::MigrationBackup { .. })));
    }

    #[test]
    fn v1_drops_empty_and_non_text_entries() {
        let backups = MemBackend::new();
        let raw = json!({"a": "keep", "b": "   ", "c": 42, "d": null});

        let migration = migrate(Some(raw.clone()), &backups).unwrap();
        assert_eq!(migration.document.entity_notes.len(), 1);
        assert_eq!(migration.document.entity_notes["a"], "keep");
        // The safety copy still has everything.
        assert_eq!(backups.migration_backups(), vec![raw]);
    }

    #[test]
    fn padded_keys_are_trimmed() {
        let backups = MemBackend::new();
        let raw = json!({" light.x ": "hi", "switch.y\t": "lamp"});

        let migration = migrate(Some(raw), &backups).unwrap();
        let keys: Vec<&String> = migration.document.entity_notes.keys().collect();
        assert_eq!(keys, vec!["light.x", "switch.y"]);
    }

    #[test]
    fn keys_colliding_after_trim_keep_one_entry() {
        let backups = MemBackend::new();
        let raw = json!({"entity_notes": {" a ": "first", "a": "second"}});

        let migration = migrate(Some(raw), &backups).unwrap();
        assert_eq!(migration.document.entity_notes.len(), 1);
        assert!(migration.document.entity_notes.contains_key("a"));
    }

    #[test]
    fn empty_object_is_treated_as_v1() {
        let backups = MemBackend::new();
        let migration = migrate(Some(json!({})), &backups).unwrap();
        assert!(migration.needs_save());
        assert!(migration.document.is_empty());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let backups = MemBackend::new();
        for raw in [json!([1, 2]), json!("notes"), json!(3)] {
            assert!(matches!(
                migrate(Some(raw), &backups),
                Err(NotesError::Persistence(_))
            ));
        }
        assert!(backups.migration_backups().is_empty());
    }

    #[test]
    fn v2_with_malformed_namespace_is_rejected() {
        let backups = MemBackend::new();
        let raw = json!({"entity_notes": ["not", "a", "map"]});
        assert!(matches!(
            migrate(Some(raw), &backups),
            Err(NotesError::Persistence(_))
        ));
    }
}
