//! Saving the reconciled registry
//!
//! The preserving writer edits the loaded document in place so styles,
//! tables and the other sheets survive. If that fails for any reason the
//! plain writer produces a fresh single-sheet workbook instead.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use umya_spreadsheet::{Cell, Spreadsheet, Worksheet};

use super::table::RegistryTable;
use crate::error::PipelineError;
use crate::excel::CellValue;
use crate::excel::column_letters;
use crate::excel::serial::{DATE_NUMBER_FORMAT, to_excel_serial};

/// Which writer produced the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WriteStrategy {
    PreserveStructure,
    Plain,
}

impl std::fmt::Display for WriteStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteStrategy::PreserveStructure => write!(f, "structure-preserving"),
            WriteStrategy::Plain => write!(f, "plain"),
        }
    }
}

pub struct RegistryWriter<'a> {
    sheet_name: &'a str,
    sheet_order: &'a [String],
    book: Option<Spreadsheet>,
}

impl<'a> RegistryWriter<'a> {
    pub fn new(sheet_name: &'a str, sheet_order: &'a [String], book: Option<Spreadsheet>) -> Self {
        Self {
            sheet_name,
            sheet_order,
            book,
        }
    }

    /// Write `table` to `output`, falling back to the plain writer on failure
    ///
    /// An empty table is refused before anything touches the disk.
    pub fn write(self, table: &RegistryTable, output: &Path) -> Result<WriteStrategy, PipelineError> {
        if table.is_empty() {
            log::error!("Registry table is empty after processing, refusing to save");
            return Err(PipelineError::EmptyData);
        }

        let primary_error = match self.book {
            Some(mut book) => {
                match write_preserving(&mut book, self.sheet_name, self.sheet_order, table, output) {
                    Ok(()) => {
                        log::info!("Workbook saved successfully to: {}", output.display());
                        return Ok(WriteStrategy::PreserveStructure);
                    }
                    Err(e) => {
                        log::error!("Error saving workbook: {:#}", e);
                        format!("{:#}", e)
                    }
                }
            }
            None => "source workbook is not editable".to_string(),
        };

        log::warn!("Falling back to plain save method");
        match write_plain(table, self.sheet_name, output) {
            Ok(()) => {
                log::info!("Registry saved without formatting to: {}", output.display());
                Ok(WriteStrategy::Plain)
            }
            Err(e) => {
                log::error!("Fallback save also failed: {:#}", e);
                Err(PipelineError::Write {
                    primary: primary_error,
                    fallback: format!("{:#}", e),
                })
            }
        }
    }
}

/// Overwrite the data region of the registry sheet inside the loaded document
fn write_preserving(
    book: &mut Spreadsheet,
    sheet_name: &str,
    sheet_order: &[String],
    table: &RegistryTable,
    output: &Path,
) -> Result<()> {
    let ws = book
        .get_sheet_by_name_mut(sheet_name)
        .with_context(|| format!("Sheet '{}' missing from editable workbook", sheet_name))?;

    let num_rows = u32::try_from(table.len() + 1).context("Too many registry rows")?;
    let num_cols = u32::try_from(table.columns().len()).context("Too many registry columns")?;
    let max_row = ws.get_highest_row();
    let max_col = ws.get_highest_column();
    log::debug!(
        "Rewriting '{}': {}x{} data over {}x{} existing",
        sheet_name,
        num_rows,
        num_cols,
        max_row,
        max_col
    );

    // Leftovers below and to the right of the new data region
    for row in (num_rows + 1)..=max_row {
        for col in 1..=max_col.max(num_cols) {
            clear_cell(ws, col, row);
        }
    }
    for row in 1..=num_rows {
        for col in (num_cols + 1)..=max_col {
            clear_cell(ws, col, row);
        }
    }

    for (col, name) in (1u32..).zip(table.columns()) {
        ws.get_cell_mut((col, 1u32)).set_value_string(name.clone());
    }

    for (row, values) in (2u32..).zip(table.rows()) {
        for (col, value) in (1u32..).zip(values) {
            if value.is_empty() {
                clear_cell(ws, col, row);
            } else {
                write_value(ws.get_cell_mut((col, row)), value);
            }
        }
    }

    resize_tables(ws, num_cols, num_rows);

    let current = sheet_names(book);
    if !same_relative_order(sheet_order, &current) {
        log::warn!("Sheet order changed to {:?}, restoring {:?}", current, sheet_order);
        restore_sheet_order(book, sheet_order);
    }
    let current = sheet_names(book);
    if !same_relative_order(sheet_order, &current) {
        bail!(
            "Sheet order changed from {:?} to {:?}",
            sheet_order,
            current
        );
    }

    let mut out = Cursor::new(Vec::<u8>::new());
    umya_spreadsheet::writer::xlsx::write_writer(book, &mut out)
        .map_err(|e| anyhow!("Failed to write workbook: {}", e))?;
    std::fs::write(output, out.into_inner())
        .with_context(|| format!("Failed to save workbook to {}", output.display()))?;
    Ok(())
}

fn clear_cell(ws: &mut Worksheet, col: u32, row: u32) {
    if ws.get_cell((col, row)).is_some() {
        ws.get_cell_mut((col, row)).set_blank();
    }
}

fn write_value(cell: &mut Cell, value: &CellValue) {
    match value {
        CellValue::Empty => {
            cell.set_blank();
        }
        CellValue::Text(s) => {
            cell.set_value_string(s.clone());
        }
        CellValue::Number(n) => {
            cell.set_value_number(*n);
        }
        CellValue::Bool(b) => {
            cell.set_value_bool(*b);
        }
        CellValue::DateTime(dt) => {
            cell.set_value_number(to_excel_serial(dt));
            cell.get_style_mut()
                .get_number_format_mut()
                .set_format_code(DATE_NUMBER_FORMAT);
        }
    }
}

/// Stretch table ranges and the auto-filter over the new data extent
fn resize_tables(ws: &mut Worksheet, num_cols: u32, num_rows: u32) {
    for table in ws.get_tables_mut().iter_mut() {
        let (start, _) = table.get_area();
        let start_col: u32 = start.get_col_num().to_owned();
        let start_row: u32 = start.get_row_num().to_owned();
        log::debug!(
            "Updating table reference to {}{}:{}{}",
            column_letters((start_col as usize).saturating_sub(1)),
            start_row,
            column_letters((num_cols as usize).saturating_sub(1)),
            num_rows
        );
        table.set_area(((start_col, start_row), (num_cols, num_rows)));
    }

    if ws.get_auto_filter().is_some() {
        let range = format!("A1:{}{}", column_letters((num_cols as usize).saturating_sub(1)), num_rows);
        log::debug!("Updating auto-filter to {}", range);
        ws.set_auto_filter(range);
    }
}

fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    (0..book.get_sheet_count())
        .filter_map(|i| book.get_sheet(&i))
        .map(|ws| ws.get_name().to_string())
        .collect()
}

/// Sort sheets by their position in `order`; unknown sheets keep their
/// relative order at the end
fn restore_sheet_order(book: &mut Spreadsheet, order: &[String]) {
    book.get_sheet_collection_mut().sort_by_key(|ws| {
        order
            .iter()
            .position(|name| name == ws.get_name())
            .unwrap_or(usize::MAX)
    });
}

/// Sheets present in both lists appear in the same order
fn same_relative_order(expected: &[String], actual: &[String]) -> bool {
    let expected: Vec<&String> = expected.iter().filter(|n| actual.contains(n)).collect();
    let actual: Vec<&String> = actual.iter().filter(|n| expected.contains(n)).collect();
    expected == actual
}

/// Fresh single-sheet workbook: bold header, autofit columns, no other styling
fn write_plain(table: &RegistryTable, sheet_name: &str, output: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    let bold_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("dd.mm.yyyy");

    for (col, name) in (0u16..).zip(table.columns()) {
        sheet.write_string_with_format(0, col, name, &bold_format)?;
    }

    for (row, values) in (1u32..).zip(table.rows()) {
        for (col, value) in (0u16..).zip(values) {
            match value {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    sheet.write_string(row, col, s)?;
                }
                CellValue::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                CellValue::DateTime(dt) => {
                    sheet.write_number_with_format(row, col, to_excel_serial(dt), &date_format)?;
                }
            }
        }
    }

    sheet.autofit();

    workbook
        .save(output)
        .with_context(|| format!("Failed to save Excel file: {}", output.display()))?;
    Ok(())
}
