mod cli;
mod config;
mod error;
mod excel;
mod inspection;
mod pipeline;
mod registry;
mod report;

use anyhow::Result;
use clap::Parser;

use cli::commands::inspect::handle_inspect_command;
use cli::commands::process::handle_process_command;
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let default_filter = if cli.verbose {
        "info,tarkastus_cli=debug".to_string()
    } else {
        config.log_level.clone()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter.as_str()))
        .format_timestamp(None)
        .init();

    log::debug!("Using configuration: {:?}", config);

    match cli.command {
        Commands::Process(args) => {
            if !handle_process_command(args, config)? {
                std::process::exit(1);
            }
        }
        Commands::Inspect(args) => handle_inspect_command(args)?,
    }

    Ok(())
}
