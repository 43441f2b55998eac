//! Per-file processing outcomes and their rendering

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use csv::Writer;
use serde::Serialize;
use uuid::Uuid;

use crate::inspection::InspectionRecord;

/// Filename used for results that concern the whole run
pub const RUN_LEVEL_FILENAME: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Added,
    Updated,
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Added => "Added",
            Status::Updated => "Updated",
            Status::Error => "Error",
        };
        write!(f, "{}", s)
    }
}

/// Outcome for one inspection file (or one run-level failure)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingResult {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub owner: Option<String>,
    pub filename: String,
}

impl ProcessingResult {
    fn from_record(status: Status, record: &InspectionRecord) -> Self {
        Self {
            status,
            message: None,
            model: record.model.clone(),
            serial_number: record.serial_number.clone(),
            owner: record.owner.clone(),
            filename: record.filename.clone(),
        }
    }

    pub fn added(record: &InspectionRecord) -> Self {
        Self::from_record(Status::Added, record)
    }

    pub fn updated(record: &InspectionRecord) -> Self {
        Self::from_record(Status::Updated, record)
    }

    pub fn error(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            model: None,
            serial_number: None,
            owner: None,
            filename: filename.into(),
        }
    }

    /// The single result reported when the run itself fails
    pub fn run_failure(message: impl Into<String>) -> Self {
        Self::error(RUN_LEVEL_FILENAME, message)
    }
}

/// Counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub added: usize,
    pub updated: usize,
    pub errors: usize,
}

impl StatusSummary {
    pub fn from_results(results: &[ProcessingResult]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut summary, result| {
                match result.status {
                    Status::Added => summary.added += 1,
                    Status::Updated => summary.updated += 1,
                    Status::Error => summary.errors += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.added + self.updated + self.errors
    }
}

impl std::fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} processed: {} added, {} updated, {} errors",
            self.total(),
            self.added,
            self.updated,
            self.errors
        )
    }
}

/// JSON document printed by `process --format json`
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub run_id: Uuid,
    pub output_path: Option<String>,
    pub summary: StatusSummary,
    pub results: &'a [ProcessingResult],
}

/// Render results as an aligned, colored terminal table
pub fn format_table(results: &[ProcessingResult]) -> String {
    let headers = ["Status", "Serial", "Model", "Owner", "File", "Message"];
    let rows: Vec<[String; 6]> = results
        .iter()
        .map(|r| {
            [
                r.status.to_string(),
                r.serial_number.clone().unwrap_or_default(),
                r.model.clone().unwrap_or_default(),
                r.owner.clone().unwrap_or_default(),
                r.filename.clone(),
                r.message.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| pad(h, *w))
        .collect();
    out.push_str(&header_line.join("  ").bold().to_string());
    out.push('\n');

    for (row, result) in rows.iter().zip(results) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| pad(cell, *w))
            .collect();
        let (status, rest) = cells
            .split_first()
            .map(|(s, r)| (s.clone(), r.join("  ")))
            .unwrap_or_default();
        let status = match result.status {
            Status::Added => status.green(),
            Status::Updated => status.cyan(),
            Status::Error => status.red(),
        };
        out.push_str(format!("{}  {}", status, rest).trim_end());
        out.push('\n');
    }

    out
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

/// Write results as CSV with one line per file
pub fn write_csv(results: &[ProcessingResult], path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(["status", "serial_number", "model", "owner", "filename", "message"])
        .context("Failed to write CSV header")?;

    for result in results {
        wtr.write_record([
            result.status.to_string().as_str(),
            result.serial_number.as_deref().unwrap_or(""),
            result.model.as_deref().unwrap_or(""),
            result.owner.as_deref().unwrap_or(""),
            result.filename.as_str(),
            result.message.as_deref().unwrap_or(""),
        ])
        .with_context(|| format!("Failed to write result for {}", result.filename))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;

    log::info!("Processing report written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ProcessingResult> {
        let record = InspectionRecord {
            serial_number: Some("SN001".into()),
            model: Some("CraneX".into()),
            filename: "a.xlsx".into(),
            ..Default::default()
        };
        vec![
            ProcessingResult::updated(&record),
            ProcessingResult::added(&record),
            ProcessingResult::error("b.xlsx", "Extraction failed: no meaningful data"),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let summary = StatusSummary::from_results(&sample());
        assert_eq!(
            summary,
            StatusSummary {
                added: 1,
                updated: 1,
                errors: 1
            }
        );
        assert_eq!(summary.to_string(), "3 processed: 1 added, 1 updated, 1 errors");
    }

    #[test]
    fn test_run_failure_uses_placeholder_filename() {
        let result = ProcessingResult::run_failure("Customer registry file not found: x");
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.filename, RUN_LEVEL_FILENAME);
    }

    #[test]
    fn test_table_lists_every_result() {
        colored::control::set_override(false);
        let table = format_table(&sample());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Status"));
        assert!(lines[1].starts_with("Updated"));
        assert!(lines[3].contains("no meaningful data"));
    }

    #[test]
    fn test_csv_report() {
        let path = std::env::temp_dir().join(format!("tarkastus_report_{}.csv", Uuid::new_v4()));
        write_csv(&sample(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][0], "Updated");
        assert_eq!(&records[0][1], "SN001");
        assert_eq!(&records[2][4], "b.xlsx");
    }
}
