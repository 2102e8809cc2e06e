use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tally_core::{LoadOutcome, Priority, TaskStatus, TaskStore};
use tally_ingest::source_for;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod export;
mod shell;
mod view;

use view::Filter;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "ROI tracker for sales tasks")]
struct Cli {
    /// Task document: file path or http(s) URL (default: config source.location)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Only tasks with this status (todo, in-progress, done)
    #[arg(long, value_parser = parse_status)]
    status: Option<TaskStatus>,

    /// Only tasks with this priority (low, medium, high)
    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,

    /// Case-insensitive text to look for in title or notes
    #[arg(long)]
    search: Option<String>,
}

impl From<FilterArgs> for Filter {
    fn from(a: FilterArgs) -> Self {
        Filter {
            status: a.status,
            priority: a.priority,
            search: a.search,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print tasks in ROI order
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Max rows (default: config view.limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print aggregate metrics and the performance grade
    Metrics,

    /// Write the sorted task view to a CSV file
    Export {
        /// Output CSV path
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Interactive session: add, update, delete and undo over the loaded tasks
    Shell,

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.tally/config.toml with defaults (if missing)
    Init,
    /// Print the effective config
    Show,
}

fn parse_status(s: &str) -> std::result::Result<TaskStatus, String> {
    TaskStatus::parse(s).ok_or_else(|| format!("unknown status '{s}'"))
}

fn parse_priority(s: &str) -> std::result::Result<Priority, String> {
    Priority::parse(s).ok_or_else(|| format!("unknown priority '{s}'"))
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tally_core=debug,tally_ingest=debug,info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_config()?;
    let location = cli.source.unwrap_or_else(|| cfg.source.location.clone());

    match cli.command {
        Command::List { filter, limit } => {
            let store = open_store(&location).await?;
            let filter = Filter::from(filter);
            let rows = filter.apply(store.derived_sorted());
            let limit = limit.unwrap_or(cfg.view.limit);

            println!("{} of {} tasks (by ROI)\n", rows.len().min(limit), rows.len());
            for d in rows.iter().take(limit) {
                println!("{}", view::render_row(d));
            }
        }

        Command::Metrics => {
            let store = open_store(&location).await?;
            print!("{}", view::render_metrics(store.metrics()));
        }

        Command::Export { out, filter } => {
            let store = open_store(&location).await?;
            let rows = Filter::from(filter).apply(store.derived_sorted());
            export::export_csv(&out, &rows)?;
            println!("Wrote {} rows to {}", rows.len(), out.display());
        }

        Command::Shell => {
            let mut store = open_store(&location).await?;
            shell::run_shell(&mut store)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// Build a store and run its one initial load.
async fn open_store(location: &str) -> Result<TaskStore> {
    let mut store = TaskStore::new();
    let outcome = store.load(&source_for(location)).await;
    debug!(?outcome, tasks = store.tasks().len(), "initial load finished");
    if outcome == LoadOutcome::Cancelled {
        bail!("task load from {location} was cancelled");
    }
    if let Some(err) = store.error() {
        eprintln!(
            "warning: could not load {location}: {err}\n         showing {} sample tasks instead\n",
            store.tasks().len()
        );
    }
    Ok(store)
}
