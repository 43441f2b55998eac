//! `process` command: run the registry update and print the report

use anyhow::{Context, Result};
use colored::*;

use super::{OutputFormat, ProcessCommands};
use crate::config::Config;
use crate::pipeline::{RunOutcome, update_registry};
use crate::report::{JsonReport, format_table, write_csv};

/// Returns `Ok(false)` when the run failed at registry level
pub fn handle_process_command(args: ProcessCommands, mut config: Config) -> Result<bool> {
    if args.no_color {
        colored::control::set_override(false);
    }

    if let Some(output) = args.output {
        config.output_path = output;
    }
    if let Some(sheet) = args.sheet {
        config.registry_sheet = sheet;
    }

    let outcome = update_registry(&args.registry, &args.files, &config);

    if let Some(report_path) = &args.report {
        write_csv(&outcome.results, report_path)?;
    }

    match args.format {
        OutputFormat::Table => print_table(&outcome),
        OutputFormat::Json => print_json(&outcome)?,
    }

    Ok(outcome.is_success())
}

fn print_table(outcome: &RunOutcome) {
    println!("{}", format_table(&outcome.results));

    let summary = outcome.summary();
    match &outcome.output_path {
        Some(path) => {
            println!("{}", summary.to_string().bold());
            let strategy = outcome
                .write_strategy
                .map(|s| s.to_string())
                .unwrap_or_default();
            println!(
                "Registry saved to {} ({} save)",
                path.display().to_string().bright_green(),
                strategy
            );
        }
        None => println!("{}", "Registry was not updated".red().bold()),
    }
    println!("Run: {}", outcome.run_id.to_string().dimmed());
}

fn print_json(outcome: &RunOutcome) -> Result<()> {
    let report = JsonReport {
        run_id: outcome.run_id,
        output_path: outcome
            .output_path
            .as_ref()
            .map(|p| p.display().to_string()),
        summary: outcome.summary(),
        results: &outcome.results,
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
