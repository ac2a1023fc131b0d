//! # Configuration
//!
//! Options live in `config.json` inside the storage directory. Missing fields
//! fall back to their defaults, so older config files keep loading.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `debug-logging` | `false` | Raise the CLI log level to `debug` |
//! | `max-note-length` | `200` | Notes are truncated to this many characters (50..=2000) |
//! | `auto-backup` | `false` | Rewrite the backup file after every change |
//! | `hide-buttons-when-empty` | `false` | Hint for UI clients; the store ignores it |
//! | `delete-on-entity-removal` | `true` | Drop an entity note when the entity is removed |
//! | `delete-on-device-removal` | `true` | Drop a device note when the device is removed |
//! | `enable-device-notes` | `true` | Allow writes to the device namespace |
//!
//! A config is checked once with [`NotesConfig::validate`] when a store is
//! opened; the store never re-reads it afterwards.

use crate::error::{NotesError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const MIN_NOTE_LENGTH: usize = 50;
pub const MAX_NOTE_LENGTH: usize = 2000;
pub const DEFAULT_NOTE_LENGTH: usize = 200;

pub const CONFIG_KEYS: [&str; 7] = [
    "debug-logging",
    "max-note-length",
    "auto-backup",
    "hide-buttons-when-empty",
    "delete-on-entity-removal",
    "delete-on-device-removal",
    "enable-device-notes",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotesConfig {
    pub debug_logging: bool,
    pub max_note_length: usize,
    pub auto_backup: bool,
    pub hide_buttons_when_empty: bool,
    pub delete_on_entity_removal: bool,
    pub delete_on_device_removal: bool,
    pub enable_device_notes: bool,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            debug_logging: false,
            max_note_length: DEFAULT_NOTE_LENGTH,
            auto_backup: false,
            hide_buttons_when_empty: false,
            delete_on_entity_removal: true,
            delete_on_device_removal: true,
            enable_device_notes: true,
        }
    }
}

impl NotesConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NotesError::Io)?;
        let config: NotesConfig = serde_json::from_str(&content).map_err(|e| {
            NotesError::Config(format!("{} is not valid: {}", config_path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        self.validate()?;
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NotesError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NotesError::Serialization)?;
        fs::write(config_path, content).map_err(NotesError::Io)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_NOTE_LENGTH..=MAX_NOTE_LENGTH).contains(&self.max_note_length) {
            return Err(NotesError::Config(format!(
                "max-note-length must be between {} and {}, got {}",
                MIN_NOTE_LENGTH, MAX_NOTE_LENGTH, self.max_note_length
            )));
        }
        Ok(())
    }

    /// Look up a value by its kebab-case key.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "debug-logging" => self.debug_logging.to_string(),
            "max-note-length" => self.max_note_length.to_string(),
            "auto-backup" => self.auto_backup.to_string(),
            "hide-buttons-when-empty" => self.hide_buttons_when_empty.to_string(),
            "delete-on-entity-removal" => self.delete_on_entity_removal.to_string(),
            "delete-on-device-removal" => self.delete_on_device_removal.to_string(),
            "enable-device-notes" => self.enable_device_notes.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a value by its kebab-case key. The result is validated as a whole.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let mut next = self.clone();
        match key {
            "debug-logging" => next.debug_logging = parse_bool(key, value)?,
            "max-note-length" => {
                next.max_note_length = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("{} expects a number, got `{}`", key, value))?
            }
            "auto-backup" => next.auto_backup = parse_bool(key, value)?,
            "hide-buttons-when-empty" => next.hide_buttons_when_empty = parse_bool(key, value)?,
            "delete-on-entity-removal" => next.delete_on_entity_removal = parse_bool(key, value)?,
            "delete-on-device-removal" => next.delete_on_device_removal = parse_bool(key, value)?,
            "enable-device-notes" => next.enable_device_notes = parse_bool(key, value)?,
            other => return Err(format!("Unknown config key: {}", other)),
        }
        next.validate().map_err(|e| match e {
            NotesError::Config(msg) => msg,
            other => other.to_string(),
        })?;
        *self = next;
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!("{} expects true or false, got `{}`", key, value)),
    }
}
