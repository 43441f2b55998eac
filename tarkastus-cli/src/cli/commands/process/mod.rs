mod handler;

pub use handler::handle_process_command;

use std::path::PathBuf;

use clap::{Args, ValueEnum};

#[derive(Args, Debug)]
pub struct ProcessCommands {
    /// Registry workbook to update
    #[arg(short, long)]
    pub registry: PathBuf,

    /// Output workbook (overrides the configured path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Registry sheet name (overrides the configured sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Also write the processing report as CSV
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// How to print the processing report
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Inspection report spreadsheets
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
