//! notekeep CLI
//!
//! Command-line and terminal interface for notekeep, a priority-ordered
//! note list.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use notekeep_core::{Config, NoteDatabase, NoteRepository, NoteViewModel, SqliteNoteDao};

mod commands;
mod editor;
mod output;
mod tui;

use commands::note::NoteFields;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "notekeep")]
#[command(about = "notekeep - Priority-ordered notes")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Add a note (opens editor unless title and description are given)
    #[command(alias = "create")]
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// List all notes, highest priority first
    #[command(alias = "ls")]
    List,
    /// Show a note
    Show {
        /// Note ID
        id: i64,
    },
    /// Edit a note (opens editor unless a field is given)
    Edit {
        /// Note ID
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note ID
        id: i64,
    },
    /// Delete all notes
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show status (storage location, schema, note count)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(clap::Args)]
struct FieldArgs {
    /// Note title
    #[arg(short = 'T', long)]
    title: Option<String>,
    /// Note description
    #[arg(short, long)]
    description: Option<String>,
    /// Priority (1-10)
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=10))]
    priority: Option<i32>,
}

impl From<FieldArgs> for NoteFields {
    fn from(args: FieldArgs) -> Self {
        NoteFields {
            title: args.title,
            description: args.description,
            priority: args.priority,
        }
    }
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, seed_sample_notes, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    let is_tui = matches!(&cli.command, Some(Commands::Tui) | None);
    if !is_tui {
        init_cli_logging();
    }

    let db = match NoteDatabase::open(&config) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            if let Some(hint) = e.recovery_suggestion() {
                eprintln!("Hint: {}", hint);
            }
            return Err(e).context("Failed to open note database");
        }
    };
    let repository = NoteRepository::new(Arc::new(SqliteNoteDao::new(Arc::clone(&db))))
        .context("Failed to load notes")?;
    let view_model = NoteViewModel::new(repository);
    debug!(outcome = ?db.open_outcome(), "Store ready");

    match cli.command {
        None | Some(Commands::Tui) => tui::run(&config, view_model).await,
        Some(Commands::Add { fields }) => {
            commands::note::add(&view_model, fields.into(), &output).await
        }
        Some(Commands::List) => commands::note::list(&view_model, &output),
        Some(Commands::Show { id }) => commands::note::show(&view_model, id, &output).await,
        Some(Commands::Edit { id, fields }) => {
            commands::note::edit(&view_model, id, fields.into(), &output).await
        }
        Some(Commands::Delete { id }) => commands::note::delete(&view_model, id, &output).await,
        Some(Commands::Clear { yes }) => commands::note::clear(&view_model, yes, &output).await,
        Some(Commands::Status) => commands::status::show(&config, &db, &view_model, &output).await,
        Some(Commands::Config { .. }) => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging for CLI commands
///
/// Only initializes if NOTEKEEP_LOG is set; logs go to stderr so they never
/// mix with command output.
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("NOTEKEEP_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "notekeep_core={},notekeep_cli={}",
        log_level, log_level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
