//! # Entity Notes
//!
//! A small, durable store for short free-text notes attached to external
//! objects. Each note is keyed by the object's identifier and lives in one of
//! two namespaces: entity notes and device notes.
//!
//! The library does not know who owns those identifiers. It takes plain
//! strings in, hands plain data and change events back, and is equally happy
//! behind an HTTP service, a home-automation integration, or the bundled
//! `enotes` CLI.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, cli/)                               │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs) → Commands (commands/*.rs)                    │
//! │  - Returns structured CmdResult values                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  NoteStore (store/note_store.rs)                            │
//! │  - In-memory cache, content policy, notifications           │
//! │  - Schema migration on open (migrate.rs)                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Backends (store/)                                          │
//! │  - StorageBackend + BackupBackend traits                    │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Note Policy
//!
//! - Bodies are trimmed and truncated to `max_note_length` characters.
//! - An empty body deletes the key; no key ever maps to an empty note.
//! - Every change saves both namespaces before the call returns, then
//!   notifies listeners.
//!
//! ## Logging
//!
//! The library logs through the `log` facade and never installs a logger.
//! The `enotes` binary uses `env_logger`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: One module per operation
//! - [`store`]: `NoteStore` and its backends
//! - [`migrate`]: v1 → v2 schema migration
//! - [`notify`]: Change events and the removal signal
//! - [`model`]: `Namespace`, `NoteCollection`, `NotesDocument`
//! - [`config`]: `NotesConfig`
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod migrate;
pub mod model;
pub mod notify;
pub mod store;

pub use config::NotesConfig;
pub use error::{NotesError, Result};
pub use model::{Namespace, NoteCollection, NotesDocument};
pub use notify::{NoteEvent, ObjectRemoved};
pub use store::{FsBackend, MemBackend, NoteStore, RestoreReport};
