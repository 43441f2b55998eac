pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::inspect::InspectCommands;
use commands::process::ProcessCommands;

/// Update a lifting-equipment registry from inspection report spreadsheets
#[derive(Parser, Debug)]
#[command(name = "tarkastus-cli", version, about)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/tarkastus/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge inspection files into the registry and write the updated workbook
    Process(ProcessCommands),
    /// Extract inspection files and print what was found, without touching a registry
    Inspect(InspectCommands),
}
