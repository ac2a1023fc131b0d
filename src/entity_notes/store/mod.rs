//! # Storage Layer
//!
//! Notes are held in memory by [`note_store::NoteStore`] and mirrored to disk
//! through two narrow traits:
//!
//! - [`backend::StorageBackend`]: the versioned notes file. `load` returns the
//!   raw payload, `save` writes the whole document.
//! - [`backend::BackupBackend`]: the operator backup file plus the safety copy
//!   taken before a schema migration.
//!
//! Splitting raw I/O from policy keeps the store testable without a
//! filesystem.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production, one directory, atomic writes.
//! - [`mem_backend::MemBackend`]: testing, with write-failure simulation.
//!
//! ## Write Policy
//!
//! Every mutation saves both namespaces in a single write before it returns.
//! There is no batching: notes are small and edited by hand, so durability
//! wins over write count.
//!
//! ## Storage Layout
//!
//! ```text
//! <storage_dir>/
//! ├── entity_notes                  # {"version": 2, "key": ..., "saved_at": ..., "data": {...}}
//! ├── entity_notes_backup.json      # {"entity_notes": {...}, "device_notes": {...}}
//! ├── entity_notes_v1_backup.json   # raw legacy payload, written once before migrating
//! └── config.json                   # NotesConfig
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod note_store;

pub use backend::{BackupBackend, StorageBackend};
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use note_store::{NoteStore, RestoreReport};
