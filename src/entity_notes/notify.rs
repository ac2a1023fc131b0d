//! Change notification and the removal signal coming back in.
//!
//! Listeners run synchronously, after the store has committed the change in
//! memory and on disk. They only ever see a `&NoteEvent`; the store is
//! exclusively borrowed while they run, so they cannot call back into it.

use crate::model::Namespace;
use serde::Serialize;

pub const ENTITY_NOTE_CHANGED: &str = "entity_note_changed";
pub const DEVICE_NOTE_CHANGED: &str = "device_note_changed";

/// A committed change to one note. An empty `note` means the key was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteEvent {
    pub namespace: Namespace,
    pub key: String,
    pub note: String,
}

impl NoteEvent {
    pub fn new(namespace: Namespace, key: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            namespace,
            key: key.into(),
            note: note.into(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self.namespace {
            Namespace::Entity => ENTITY_NOTE_CHANGED,
            Namespace::Device => DEVICE_NOTE_CHANGED,
        }
    }

    pub fn is_removal(&self) -> bool {
        self.note.is_empty()
    }
}

/// Inbound signal: the object owning `key` no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRemoved {
    pub namespace: Namespace,
    pub key: String,
}

impl ObjectRemoved {
    pub fn new(namespace: Namespace, key: impl Into<String>) -> Self {
        Self {
            namespace,
            key: key.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&NoteEvent)>;

/// Ordered list of change listeners.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&NoteEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, event: &NoteEvent) {
        log::debug!(
            "{} key={} removed={}",
            event.event_type(),
            event.key,
            event.is_removal()
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
