//! # API Facade
//!
//! [`NotesApi`] is the single entry point for callers: a service layer, the
//! `enotes` binary, or tests. It dispatches to `commands/*.rs` and returns
//! [`CmdResult`] values. It does no I/O of its own and has no opinion about
//! presentation.
//!
//! Generic over the two storage traits, so the same facade runs on
//! `FsBackend` in production and `MemBackend` in tests.

use crate::commands;
use crate::config::NotesConfig;
use crate::error::Result;
use crate::model::Namespace;
use crate::notify::{ListenerId, NoteEvent};
use crate::store::{BackupBackend, FsBackend, NoteStore, StorageBackend};
use std::path::{Path, PathBuf};

pub struct NotesApi<S: StorageBackend, K: BackupBackend> {
    store: NoteStore<S, K>,
    config_dir: PathBuf,
}

impl NotesApi<FsBackend, FsBackend> {
    /// Open the file-backed store in `data_dir`, using `config.json` from the
    /// same directory.
    pub fn open_dir(data_dir: &Path) -> Result<Self> {
        let config = NotesConfig::load(data_dir)?;
        let store = NoteStore::open(
            FsBackend::new(data_dir.to_path_buf()),
            FsBackend::new(data_dir.to_path_buf()),
            config,
        )?;
        Ok(Self::new(store, data_dir.to_path_buf()))
    }
}

impl<S: StorageBackend, K: BackupBackend> NotesApi<S, K> {
    pub fn new(store: NoteStore<S, K>, config_dir: PathBuf) -> Self {
        Self { store, config_dir }
    }

    pub fn get_note(&self, namespace: Namespace, key: &str) -> Result<commands::CmdResult> {
        commands::get::run(&self.store, namespace, key)
    }

    pub fn set_note(
        &mut self,
        namespace: Namespace,
        key: &str,
        body: &str,
    ) -> Result<commands::CmdResult> {
        commands::set::run(&mut self.store, namespace, key, body)
    }

    pub fn delete_note(&mut self, namespace: Namespace, key: &str) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.store, namespace, key)
    }

    pub fn list_notes(&self, namespace: Namespace) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, namespace)
    }

    pub fn backup(&self) -> Result<commands::CmdResult> {
        commands::backup::run(&self.store)
    }

    pub fn restore(&mut self) -> Result<commands::CmdResult> {
        commands::restore::run(&mut self.store)
    }

    pub fn object_removed(
        &mut self,
        namespace: Namespace,
        key: &str,
    ) -> Result<commands::CmdResult> {
        commands::removal::run(&mut self.store, namespace, key)
    }

    pub fn status(&self) -> Result<commands::CmdResult> {
        commands::status::run(&self.store)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&NoteEvent) + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn store(&self) -> &NoteStore<S, K> {
        &self.store
    }

    pub fn into_store(self) -> NoteStore<S, K> {
        self.store
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotesError;
    use crate::store::MemBackend;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn mem_api() -> NotesApi<MemBackend, MemBackend> {
        let store =
            NoteStore::open(MemBackend::new(), MemBackend::new(), NotesConfig::default()).unwrap();
        NotesApi::new(store, PathBuf::from("unused"))
    }

    #[test]
    fn dispatches_set_get_delete() {
        let mut api = mem_api();
        api.set_note(Namespace::Entity, "light.x", "hi").unwrap();

        let got = api.get_note(Namespace::Entity, "light.x").unwrap();
        assert_eq!(got.listed_notes["light.x"], "hi");

        api.delete_note(Namespace::Entity, "light.x").unwrap();
        assert!(matches!(
            api.delete_note(Namespace::Entity, "light.x"),
            Err(NotesError::NotFound(_))
        ));
    }

    #[test]
    fn list_reports_namespace() {
        let mut api = mem_api();
        api.set_note(Namespace::Device, "d1", "attic").unwrap();
        let result = api.list_notes(Namespace::Device).unwrap();
        assert_eq!(result.namespace, Some(Namespace::Device));
        assert_eq!(result.listed_notes.len(), 1);
    }

    #[test]
    fn subscribers_see_removals_from_signals() {
        let mut api = mem_api();
        api.set_note(Namespace::Entity, "a", "1").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        api.subscribe(move |e| sink.borrow_mut().push((e.key.clone(), e.note.clone())));

        api.object_removed(Namespace::Entity, "a").unwrap();
        assert_eq!(*seen.borrow(), vec![("a".to_string(), String::new())]);
    }

    #[test]
    fn open_dir_uses_config_from_data_dir() {
        let dir = TempDir::new().unwrap();
        NotesConfig {
            max_note_length: 60,
            ..Default::default()
        }
        .save(dir.path())
        .unwrap();

        let mut api = NotesApi::open_dir(dir.path()).unwrap();
        let result = api
            .set_note(Namespace::Entity, "a", &"q".repeat(100))
            .unwrap();
        assert_eq!(result.listed_notes["a"].len(), 60);
        assert!(dir.path().join("entity_notes").exists());
    }
}
