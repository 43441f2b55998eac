//! Untyped row/column view of a worksheet
//!
//! Inspection reports have no header row, so every lookup is positional.
//! The grid keeps absolute sheet coordinates: row 0 is spreadsheet row 1 and
//! column 0 is column A, even when the first used cell sits further down.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, DataType, Range, Reader, open_workbook_auto};
use chrono::NaiveDateTime;

/// A single cell value, detached from the workbook it was read from
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Convert a calamine cell
    pub fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_datetime() {
                Some(dt) => CellValue::DateTime(dt),
                None => CellValue::Text(data.to_string()),
            },
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }

    /// Empty cells and whitespace-only strings count as missing
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text form used for keys and display, `None` when the cell is empty.
    ///
    /// Whole numbers lose their fractional part so a serial typed as
    /// `12345` and one stored as `12345.0` compare equal.
    pub fn to_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.date().to_string()
                } else {
                    dt.to_string()
                }
            }
        };
        if text.is_empty() { None } else { Some(text) }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text().unwrap_or_default())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

/// Rectangular, absolutely addressed copy of one worksheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl SheetGrid {
    /// Build a grid from rows of unequal length; short rows are padded
    #[cfg(test)]
    pub fn from_rows(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self { rows, width }
    }

    /// Copy a calamine range, keeping absolute positions
    pub fn from_range(range: &Range<Data>) -> Self {
        let (Some((start_row, start_col)), Some((end_row, end_col))) = (range.start(), range.end())
        else {
            return Self::default();
        };

        let height = end_row as usize + 1;
        let width = end_col as usize + 1;
        let mut rows = vec![vec![CellValue::Empty; width]; height];

        for (row, col, data) in range.used_cells() {
            rows[start_row as usize + row][start_col as usize + col] = CellValue::from_data(data);
        }

        Self { rows, width }
    }

    /// Load the first worksheet of a spreadsheet file (xlsx, xlsm, xls, ods)
    pub fn open_first_sheet(path: &Path) -> Result<Self> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

        let range = workbook
            .worksheet_range_at(0)
            .context("Spreadsheet has no sheets")?
            .with_context(|| format!("Failed to read first sheet of {}", path.display()))?;

        Ok(Self::from_range(&range))
    }

    /// Load the first worksheet from raw spreadsheet bytes
    #[cfg(test)]
    pub fn first_sheet_from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut workbook = calamine::open_workbook_auto_from_rs(std::io::Cursor::new(bytes))
            .context("Failed to open spreadsheet from memory")?;

        let range = workbook
            .worksheet_range_at(0)
            .context("Spreadsheet has no sheets")?
            .context("Failed to read first sheet")?;

        Ok(Self::from_range(&range))
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Bounds-checked cell access (0-based)
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Cell at the position if it holds something
    pub fn non_empty(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.get(row, col).filter(|v| !v.is_empty())
    }

    /// Text content of a string cell
    pub fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.get(row, col).and_then(CellValue::as_str)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }
}
