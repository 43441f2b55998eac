//! `inspect` command: dry-run extraction

use anyhow::{Context, Result};
use colored::*;

use super::InspectCommands;
use crate::inspection::{InspectionRecord, extract_inspection_file};
use crate::inspection::dates::format_registry_date;

pub fn handle_inspect_command(args: InspectCommands) -> Result<()> {
    let records: Vec<InspectionRecord> = args
        .files
        .iter()
        .map(|path| extract_inspection_file(path))
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
        println!("{}", json);
        return Ok(());
    }

    for record in &records {
        print_record(record);
        println!();
    }
    Ok(())
}

fn print_record(record: &InspectionRecord) {
    println!("{}", record.filename.bold());

    if let Some(error) = &record.error {
        println!("  {} {}", "error:".red(), error);
        return;
    }

    let date = |d: Option<chrono::NaiveDate>| d.map(format_registry_date).unwrap_or_default();
    let text = |s: &Option<String>| s.clone().unwrap_or_default();

    let fields = [
        ("Inspection type", record.inspection_type.clone()),
        ("Inspection date", date(record.inspection_date)),
        ("Next inspection", date(record.next_inspection_date)),
        ("Kympitys", date(record.kympitys_date)),
        ("Manufacturer", text(&record.manufacturer)),
        ("Model", text(&record.model)),
        ("Serial number", text(&record.serial_number)),
        ("Owner", text(&record.owner)),
        ("Address", text(&record.owner_address)),
        ("Result", record.inspection_result.to_string()),
    ];

    for (label, value) in fields {
        if value.is_empty() {
            println!("  {:<16} {}", label, "-".dimmed());
        } else {
            println!("  {:<16} {}", label, value);
        }
    }

    if !record.has_meaningful_data() {
        println!("  {}", "no model, serial number or inspection date found".yellow());
    }
}
