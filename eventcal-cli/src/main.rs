mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eventcal_core::EventStore;
use eventcal_core::config::EventcalConfig;
use tracing_subscriber::EnvFilter;

use commands::edit::EditArgs;
use commands::form::EventArgs;

#[derive(Parser)]
#[command(name = "eventcal")]
#[command(about = "Plan events and recurring series, and catch double-bookings")]
struct Cli {
    /// Events file to use instead of data_file from the config
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an event, expanding it if it repeats
    Add(EventArgs),
    /// Preview the occurrences an event would have, without saving
    Expand(EventArgs),
    /// Change fields of an event
    Edit {
        id: String,

        #[command(flatten)]
        args: EditArgs,
    },
    /// Move an event to another day, keeping its time
    Move {
        id: String,

        /// Target day (YYYY-MM-DD or e.g. "next monday")
        date: String,
    },
    /// Delete an event; deleting a series head removes the whole series
    Delete {
        id: String,

        /// Don't ask before deleting a whole series
        #[arg(short, long)]
        yes: bool,
    },
    /// List events for a day (default today) or a month
    List {
        /// Day to show (YYYY-MM-DD)
        #[arg(long, conflicts_with = "month")]
        date: Option<String>,

        /// Month to show (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
    /// Find events by title or description
    Search { query: String },
    /// Show events overlapping an existing event
    Conflicts { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = EventcalConfig::load()?;
    let data_path = cli.file.unwrap_or_else(|| config.data_path());
    tracing::debug!(path = %data_path.display(), "Using events file");

    let mut store = EventStore::open(&data_path)
        .with_context(|| format!("Failed to load events from {}", data_path.display()))?;

    let changed = match cli.command {
        Commands::Add(args) => {
            let form = args.to_form(&config)?;
            commands::add::run(&mut store, form)?;
            true
        }
        Commands::Expand(args) => {
            let form = args.to_form(&config)?;
            commands::expand::run(form)?;
            false
        }
        Commands::Edit { id, args } => {
            commands::edit::run(&mut store, &id, args)?;
            true
        }
        Commands::Move { id, date } => {
            commands::reschedule::run(&mut store, &id, &date)?;
            true
        }
        Commands::Delete { id, yes } => commands::delete::run(&mut store, &id, yes)?,
        Commands::List { date, month } => {
            commands::list::run(&store, date.as_deref(), month.as_deref())?;
            false
        }
        Commands::Search { query } => {
            commands::search::run(&store, &query)?;
            false
        }
        Commands::Conflicts { id } => {
            commands::conflicts::run(&store, &id)?;
            false
        }
    };

    if changed {
        store
            .save(&data_path)
            .with_context(|| format!("Failed to save events to {}", data_path.display()))?;
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
