use colored::Colorize;
use entity_notes::api::{CmdMessage, MessageLevel};
use entity_notes::config::{NotesConfig, CONFIG_KEYS};
use entity_notes::NoteCollection;
use unicode_width::UnicodeWidthStr;

const MAX_KEY_WIDTH: usize = 40;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// One note per line, keys padded to a common display width.
pub fn print_notes(notes: &NoteCollection) {
    let key_width = notes
        .keys()
        .map(|k| k.width())
        .max()
        .unwrap_or(0)
        .min(MAX_KEY_WIDTH);

    for (key, note) in notes {
        let pad = key_width.saturating_sub(key.width());
        let first_line = note.lines().next().unwrap_or("");
        let more = if note.lines().nth(1).is_some() { " …" } else { "" };
        println!(
            "{}{}  {}{}",
            key.yellow(),
            " ".repeat(pad),
            first_line,
            more.dimmed()
        );
    }
}

/// The raw note body, exactly as stored.
pub fn print_note_body(notes: &NoteCollection) {
    for note in notes.values() {
        println!("{}", note);
    }
}

pub fn print_config(config: &NotesConfig) {
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}
