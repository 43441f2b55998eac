mod handler;

pub use handler::handle_inspect_command;

use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug)]
pub struct InspectCommands {
    /// Print records as JSON instead of a field listing
    #[arg(long)]
    pub json: bool,

    /// Inspection report spreadsheets
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}
