use super::backend::{BackupBackend, StorageBackend};
use crate::config::NotesConfig;
use crate::error::{NotesError, Result};
use crate::migrate::{self, MigrationOutcome};
use crate::model::{normalize_note, Namespace, NoteCollection, NotesDocument};
use crate::notify::{ChangeNotifier, ListenerId, NoteEvent, ObjectRemoved};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::path::PathBuf;

const NAMESPACES: [Namespace; 2] = [Namespace::Entity, Namespace::Device];

/// Counts of notes merged by [`NoteStore::restore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub entity: usize,
    pub device: usize,
}

impl RestoreReport {
    pub fn total(&self) -> usize {
        self.entity + self.device
    }
}

/// The in-memory note cache, mirrored to a [`StorageBackend`] on every change.
///
/// Every mutation follows the same order: update memory, save the whole
/// document, then notify listeners. A failed save is returned to the caller
/// but memory is not rolled back; the next successful save catches disk up.
pub struct NoteStore<S: StorageBackend, K: BackupBackend> {
    storage: S,
    backups: K,
    config: NotesConfig,
    notes: NotesDocument,
    notifier: ChangeNotifier,
    migration: MigrationOutcome,
}

impl<S: StorageBackend, K: BackupBackend> NoteStore<S, K> {
    /// Validate `config`, load whatever is stored, and migrate it to the
    /// current shape. An upgraded document is saved before the store is
    /// handed out.
    pub fn open(storage: S, backups: K, config: NotesConfig) -> Result<Self> {
        config.validate()?;

        let raw = storage.load()?;
        let migration = migrate::migrate(raw, &backups)?;
        if migration.needs_save() {
            storage
                .save(&migration.document)
                .map_err(|e| persistence_error(&storage, e))?;
        }

        info!(
            "opened notes at {} ({} entity, {} device, {:?})",
            storage.location().display(),
            migration.document.entity_notes.len(),
            migration.document.device_notes.len(),
            migration.outcome
        );

        Ok(Self {
            storage,
            backups,
            config,
            notes: migration.document,
            notifier: ChangeNotifier::new(),
            migration: migration.outcome,
        })
    }

    pub fn get(&self, namespace: Namespace, key: &str) -> String {
        self.notes
            .notes(namespace)
            .get(key.trim())
            .cloned()
            .unwrap_or_default()
    }

    /// Store `body` under `key` and return what was actually stored.
    ///
    /// The body is trimmed and cut to `max_note_length` characters. An empty
    /// result removes the key. Listeners get the effective body, or `""` for
    /// a removal.
    pub fn set(&mut self, namespace: Namespace, key: &str, body: &str) -> Result<String> {
        let key = self.writable_key(namespace, key)?;
        let effective = normalize_note(body, self.config.max_note_length);
        if effective.chars().count() < body.trim().chars().count() {
            debug!(
                "truncated {} note `{}` to {} characters",
                namespace, key, self.config.max_note_length
            );
        }

        let notes = self.notes.notes_mut(namespace);
        if effective.is_empty() {
            notes.remove(&key);
        } else {
            notes.insert(key.clone(), effective.clone());
        }
        debug!("set {} note `{}` ({} chars)", namespace, key, effective.chars().count());

        self.commit(&[NoteEvent::new(namespace, key, effective.clone())])?;
        Ok(effective)
    }

    /// Remove `key`. Returns false if there was nothing to remove, in which
    /// case nothing is saved and nobody is notified.
    pub fn delete(&mut self, namespace: Namespace, key: &str) -> Result<bool> {
        let key = self.writable_key(namespace, key)?;
        self.remove_note(namespace, key)
    }

    /// Snapshot of one namespace.
    pub fn list(&self, namespace: Namespace) -> NoteCollection {
        self.notes.notes(namespace).clone()
    }

    /// Snapshot of both namespaces.
    pub fn document(&self) -> NotesDocument {
        self.notes.clone()
    }

    /// React to the owning object disappearing. Only acts when the matching
    /// `delete_on_*_removal` option is on. Errors are logged, never returned:
    /// there is no caller waiting on this.
    pub fn on_external_removal(&mut self, namespace: Namespace, key: &str) {
        let enabled = match namespace {
            Namespace::Entity => self.config.delete_on_entity_removal,
            Namespace::Device => self.config.delete_on_device_removal,
        };
        if !enabled {
            debug!("ignoring removal of {} `{}`: disabled in config", namespace, key);
            return;
        }

        let key = key.trim();
        if key.is_empty() {
            warn!("ignoring removal signal with an empty {} key", namespace);
            return;
        }

        match self.remove_note(namespace, key.to_string()) {
            Ok(true) => info!("removed note for deleted {} `{}`", namespace, key),
            Ok(false) => debug!("deleted {} `{}` had no note", namespace, key),
            Err(e) => error!(
                "failed to remove note for deleted {} `{}`: {}",
                namespace, key, e
            ),
        }
    }

    pub fn handle_removal(&mut self, signal: &ObjectRemoved) {
        self.on_external_removal(signal.namespace, &signal.key);
    }

    /// Write both namespaces to the backup file, replacing any earlier backup.
    pub fn backup(&self) -> Result<PathBuf> {
        let path = self.backups.write_backup(&self.notes)?;
        info!("backed up {} note(s) to {}", self.notes.len(), path.display());
        Ok(path)
    }

    /// Merge the backup file into the live notes. Keys missing from the
    /// backup are left alone. A legacy flat backup merges into the entity
    /// namespace only.
    pub fn restore(&mut self) -> Result<RestoreReport> {
        let raw = self.backups.read_backup()?;
        let incoming = parse_backup(raw)?;

        let mut report = RestoreReport::default();
        let mut events = Vec::new();
        for namespace in NAMESPACES {
            for (key, body) in incoming.notes(namespace) {
                let effective = normalize_note(body, self.config.max_note_length);
                if effective.is_empty() {
                    continue;
                }
                self.notes
                    .notes_mut(namespace)
                    .insert(key.clone(), effective.clone());
                events.push(NoteEvent::new(namespace, key.clone(), effective));
                match namespace {
                    Namespace::Entity => report.entity += 1,
                    Namespace::Device => report.device += 1,
                }
            }
        }

        self.commit(&events)?;
        info!(
            "restored {} entity and {} device note(s) from {}",
            report.entity,
            report.device,
            self.backups.backup_path().display()
        );
        Ok(report)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&NoteEvent) + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    pub fn migration_outcome(&self) -> &MigrationOutcome {
        &self.migration
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn backups(&self) -> &K {
        &self.backups
    }

    /// Shut the store down, handing back the final state.
    pub fn close(self) -> NotesDocument {
        debug!("closing notes at {}", self.storage.location().display());
        self.notes
    }

    fn writable_key(&self, namespace: Namespace, key: &str) -> Result<String> {
        let key = key.trim();
        if key.is_empty() {
            return Err(NotesError::Validation("key must not be empty".to_string()));
        }
        if namespace == Namespace::Device && !self.config.enable_device_notes {
            return Err(NotesError::Validation(
                "device notes are disabled".to_string(),
            ));
        }
        Ok(key.to_string())
    }

    fn remove_note(&mut self, namespace: Namespace, key: String) -> Result<bool> {
        if self.notes.notes_mut(namespace).remove(&key).is_none() {
            return Ok(false);
        }
        debug!("deleted {} note `{}`", namespace, key);
        self.commit(&[NoteEvent::new(namespace, key, "")])?;
        Ok(true)
    }

    /// Save, then notify, then refresh the auto-backup.
    fn commit(&mut self, events: &[NoteEvent]) -> Result<()> {
        if let Err(e) = self.storage.save(&self.notes) {
            let e = persistence_error(&self.storage, e);
            warn!("{}", e);
            return Err(e);
        }

        for event in events {
            self.notifier.publish(event);
        }

        if self.config.auto_backup {
            if let Err(e) = self.backups.write_backup(&self.notes) {
                warn!("auto-backup failed: {}", e);
            }
        }
        Ok(())
    }
}

fn persistence_error<S: StorageBackend>(storage: &S, e: NotesError) -> NotesError {
    match e {
        NotesError::Persistence(_) => e,
        other => NotesError::Persistence(format!(
            "could not save {}: {}",
            storage.location().display(),
            other
        )),
    }
}

/// Read a backup in either the current or the legacy flat shape.
fn parse_backup(raw: Value) -> Result<NotesDocument> {
    let map = match raw {
        Value::Object(map) => map,
        _ => {
            return Err(NotesError::Restore(
                "backup must be a JSON object".to_string(),
            ))
        }
    };

    let to_restore_error = |e: NotesError| NotesError::Restore(e.to_string());
    if map.contains_key("entity_notes") {
        Ok(NotesDocument::new(
            migrate::collection_from(map.get("entity_notes"), "backup entity_notes")
                .map_err(to_restore_error)?,
            migrate::collection_from(map.get("device_notes"), "backup device_notes")
                .map_err(to_restore_error)?,
        ))
    } else {
        let raw = Value::Object(map);
        Ok(NotesDocument::new(
            migrate::collection_from(Some(&raw), "legacy backup").map_err(to_restore_error)?,
            NoteCollection::new(),
        ))
    }
}
