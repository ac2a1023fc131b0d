use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Notes keyed by the identifier of the object they annotate.
///
/// Ordered so that serialized documents are stable across writes.
pub type NoteCollection = BTreeMap<String, String>;

/// Which keyspace a note lives in. The two namespaces never share storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Entity,
    Device,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Entity => "entity",
            Namespace::Device => "device",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entity" => Ok(Namespace::Entity),
            "device" => Ok(Namespace::Device),
            other => Err(format!("unknown namespace `{other}`; expected entity|device")),
        }
    }
}

/// The current (v2) shape of the notes document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesDocument {
    #[serde(default)]
    pub entity_notes: NoteCollection,
    #[serde(default)]
    pub device_notes: NoteCollection,
}

impl NotesDocument {
    pub fn new(entity_notes: NoteCollection, device_notes: NoteCollection) -> Self {
        Self {
            entity_notes,
            device_notes,
        }
    }

    pub fn notes(&self, namespace: Namespace) -> &NoteCollection {
        match namespace {
            Namespace::Entity => &self.entity_notes,
            Namespace::Device => &self.device_notes,
        }
    }

    pub fn notes_mut(&mut self, namespace: Namespace) -> &mut NoteCollection {
        match namespace {
            Namespace::Entity => &mut self.entity_notes,
            Namespace::Device => &mut self.device_notes,
        }
    }

    pub fn len(&self) -> usize {
        self.entity_notes.len() + self.device_notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_notes.is_empty() && self.device_notes.is_empty()
    }
}

/// Applies the note content policy: trim, then cap at `max_len` characters.
///
/// An empty return value means the note should be removed.
pub fn normalize_note(body: &str, max_len: usize) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > max_len {
        trimmed.chars().take(max_len).collect()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(normalize_note("  hello \n", 200), "hello");
    }

    #[test]
    fn normalize_truncates_by_characters() {
        let body = "ééééé";
        assert_eq!(normalize_note(body, 3), "ééé");
    }

    #[test]
    fn normalize_truncation_keeps_inner_whitespace() {
        assert_eq!(normalize_note("  abc def  ", 4), "abc ");
    }

    #[test]
    fn normalize_whitespace_only_is_empty() {
        assert_eq!(normalize_note(" \t\n ", 200), "");
    }

    #[test]
    fn namespace_parses_case_insensitively() {
        assert_eq!("Device".parse::<Namespace>().unwrap(), Namespace::Device);
        assert_eq!(" entity ".parse::<Namespace>().unwrap(), Namespace::Entity);
        assert!("area".parse::<Namespace>().is_err());
    }

    #[test]
    fn document_defaults_missing_device_notes() {
        let doc: NotesDocument =
            serde_json::from_str(r#"{"entity_notes": {"light.x": "hi"}}"#).unwrap();
        assert_eq!(doc.entity_notes.get("light.x").map(String::as_str), Some("hi"));
        assert!(doc.device_notes.is_empty());
    }
}
