use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "enotes", version)]
#[command(about = "Keep short notes on entities and devices", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Operate on device notes instead of entity notes
    #[arg(short, long, global = true)]
    pub device: bool,

    /// Directory holding the notes, backups and config
    #[arg(long, global = true, env = "ENTITY_NOTES_DATA")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the note for a key
    Get { key: String },

    /// Set the note for a key (an empty note removes it)
    Set {
        key: String,

        /// Note text; multiple words are joined with spaces
        #[arg(num_args = 0.., trailing_var_arg = true)]
        body: Vec<String>,
    },

    /// Delete the note for a key
    #[command(alias = "rm")]
    Delete { key: String },

    /// List all notes in the namespace
    #[command(alias = "ls")]
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write every note to the backup file
    Backup,

    /// Merge the backup file back into the notes
    Restore,

    /// Signal that the object owning a key was removed
    Removed { key: String },

    /// Show where notes are stored and how many there are
    Status,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., max-note-length)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
