//! `ps2paper` command-line front end.
//!
//! # Responsibility
//! - Stand in for the desktop list window: show definitions, write and open
//!   snippet files.
//! - Keep all paper logic in `ps2paper_core`; this crate only formats output.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ps2paper_core::{init_logging, DisplayUnits, Settings};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ps2paper")]
#[command(about = "Inspect printer paper definitions and their PostScript page-size files")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to ./ps2paper.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error); overrides settings
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every paper definition with its size and file status
    List {
        /// Display units (mm|inch|point); overrides settings
        #[arg(short, long)]
        units: Option<DisplayUnits>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write snippet files for selected definitions
    Write {
        /// Paper names or snippet file names to write
        #[arg(required_unless_present = "all")]
        papers: Vec<String>,

        /// Select every definition whose file is not already correct
        #[arg(short, long)]
        all: bool,

        /// Overwrite files that were not created by ps2paper
        #[arg(short, long)]
        force: bool,
    },

    /// Open the snippet file for a definition
    Launch {
        /// Definition index as shown by `list`
        index: usize,
    },

    /// Show the effective settings
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ps2paper: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path).context("failed to load settings")?,
        None => Settings::load().context("failed to load settings")?,
    };

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(settings.logging.level.as_str());
    if let Err(err) = init_logging(level, settings.log_dir()) {
        // Logging is diagnostics only; carry on without it.
        eprintln!("ps2paper: logging disabled: {err}");
    }

    match cli.command {
        Commands::List { units, json } => {
            let units = units.unwrap_or(settings.display.units);
            commands::list(&settings, units, json)
        }
        Commands::Write { papers, all, force } => commands::write(&settings, &papers, all, force),
        Commands::Launch { index } => commands::launch(&settings, index),
        Commands::Config => {
            print!("{}", settings.to_toml()?);
            Ok(())
        }
    }
}
