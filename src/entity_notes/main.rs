use clap::Parser;
use directories::ProjectDirs;
use entity_notes::api::{ConfigAction, NotesApi};
use entity_notes::config::NotesConfig;
use entity_notes::error::{NotesError, Result};
use entity_notes::store::FsBackend;
use entity_notes::Namespace;
use std::path::PathBuf;

mod args;
mod cli;
use args::{Cli, Commands};
use cli::print::{print_config, print_messages, print_note_body, print_notes};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: NotesApi<FsBackend, FsBackend>,
    namespace: Namespace,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(&cli)?;
    init_logging(&cli, &data_dir);

    // Config commands never open the notes file.
    if let Some(Commands::Config { key, value }) = &cli.command {
        return handle_config(&data_dir, key.clone(), value.clone());
    }

    let mut ctx = AppContext {
        api: NotesApi::open_dir(&data_dir)?,
        namespace: if cli.device {
            Namespace::Device
        } else {
            Namespace::Entity
        },
    };

    match cli.command {
        Some(Commands::Get { key }) => handle_get(&ctx, &key),
        Some(Commands::Set { key, body }) => handle_set(&mut ctx, &key, &body.join(" ")),
        Some(Commands::Delete { key }) => handle_delete(&mut ctx, &key),
        Some(Commands::List { json }) => handle_list(&ctx, json),
        Some(Commands::Backup) => handle_backup(&ctx),
        Some(Commands::Restore) => handle_restore(&mut ctx),
        Some(Commands::Removed { key }) => handle_removed(&mut ctx, &key),
        Some(Commands::Status) => handle_status(&ctx),
        Some(Commands::Config { .. }) => Ok(()),
        None => handle_list(&ctx, false),
    }
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    ProjectDirs::from("org", "entity-notes", "entity-notes")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| NotesError::Config("could not determine a data directory".to_string()))
}

fn init_logging(cli: &Cli, data_dir: &std::path::Path) {
    let debug_logging = NotesConfig::load(data_dir)
        .map(|c| c.debug_logging)
        .unwrap_or(false);
    let level = if cli.verbose || debug_logging {
        "debug"
    } else {
        "warn"
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn handle_get(ctx: &AppContext, key: &str) -> Result<()> {
    let result = ctx.api.get_note(ctx.namespace, key)?;
    print_note_body(&result.listed_notes);
    print_messages(&result.messages);
    Ok(())
}

fn handle_set(ctx: &mut AppContext, key: &str, body: &str) -> Result<()> {
    let result = ctx.api.set_note(ctx.namespace, key, body)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, key: &str) -> Result<()> {
    let result = ctx.api.delete_note(ctx.namespace, key)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, json: bool) -> Result<()> {
    let result = ctx.api.list_notes(ctx.namespace)?;
    if json {
        let out = serde_json::to_string_pretty(&result.listed_notes)?;
        println!("{}", out);
        return Ok(());
    }
    print_notes(&result.listed_notes);
    print_messages(&result.messages);
    Ok(())
}

fn handle_backup(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.backup()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_restore(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.restore()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_removed(ctx: &mut AppContext, key: &str) -> Result<()> {
    let result = ctx.api.object_removed(ctx.namespace, key)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_status(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.status()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(data_dir: &std::path::Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = entity_notes::commands::config::run(data_dir, action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
