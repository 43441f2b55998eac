//! Resolves logical fields to concrete cells
//!
//! Two ways of finding a value:
//! - coordinate references (`AD-AG:6` style tokens from the report template),
//!   tried through a chain of interpretations until one yields a value
//! - label search, scanning a bounded window for a known caption and reading
//!   a value at a fixed offset from it

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::grid::{CellValue, SheetGrid};

/// `START-END:ROW`, e.g. `AD-AG:6` or `F-0:11`
static RANGE_TOKEN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z]{1,3})-([A-Za-z0-9]{1,3}):(\d+)\s*$").ok());

/// Leading column letters and trailing row digits, e.g. `F11` or `AD-AG:6`
static SINGLE_CELL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z]{1,3}).*?(\d+)\s*$").ok());

/// Convert spreadsheet column letters to a 0-based index (A=0, Z=25, AA=26)
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }

    let mut index: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }

    Some(index - 1)
}

/// Convert a 0-based column index back to letters (0=A, 26=AA)
pub fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A field location in the report template
///
/// `token` is the compact reference; `row`/`col` is the hand-built 0-based
/// position used when the token cannot be interpreted or points at nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub token: &'static str,
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub const fn new(token: &'static str, row: usize, col: usize) -> Self {
        Self { token, row, col }
    }
}

/// Parse a range token as "first column of range" + 1-based row
fn parse_range_start(token: &str) -> Option<(usize, usize)> {
    let caps = RANGE_TOKEN.as_ref()?.captures(token)?;
    let col = column_index(caps.get(1)?.as_str())?;
    let row: usize = caps.get(3)?.as_str().parse().ok()?;
    Some((row.checked_sub(1)?, col))
}

/// Parse the same token as a plain single-cell reference
fn parse_single_cell(token: &str) -> Option<(usize, usize)> {
    let caps = SINGLE_CELL.as_ref()?.captures(token)?;
    let col = column_index(caps.get(1)?.as_str())?;
    let row: usize = caps.get(2)?.as_str().parse().ok()?;
    Some((row.checked_sub(1)?, col))
}

/// Rows a label search is allowed to look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowWindow {
    /// Absolute 0-based rows
    Rows(Range<usize>),
    /// The last `n` rows of the sheet
    Tail(usize),
}

impl RowWindow {
    fn resolve(&self, height: usize) -> Range<usize> {
        match self {
            RowWindow::Rows(range) => range.start.min(height)..range.end.min(height),
            RowWindow::Tail(n) => height.saturating_sub(*n)..height,
        }
    }
}

/// A caption to look for inside a bounded window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelQuery {
    pub label: &'static str,
    pub rows: RowWindow,
    pub columns: Range<usize>,
}

impl LabelQuery {
    /// Search a single column
    pub fn in_column(label: &'static str, rows: RowWindow, column: usize) -> Self {
        Self {
            label,
            rows,
            columns: column..column + 1,
        }
    }
}

/// Field lookups over one loaded sheet
#[derive(Debug, Clone, Copy)]
pub struct CellLocator<'a> {
    grid: &'a SheetGrid,
}

impl<'a> CellLocator<'a> {
    pub fn new(grid: &'a SheetGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &'a SheetGrid {
        self.grid
    }

    /// Resolve a coordinate reference, trying each interpretation in order
    ///
    /// Out-of-bounds or empty cells count as a failed attempt; the next
    /// interpretation is tried. Returns `None` when all of them fail.
    pub fn resolve(&self, cell: &CellRef) -> Option<&'a CellValue> {
        let attempts = [
            ("range start", parse_range_start(cell.token)),
            ("single cell", parse_single_cell(cell.token)),
            ("direct", Some((cell.row, cell.col))),
        ];

        for (strategy, position) in attempts {
            let Some((row, col)) = position else {
                log::debug!("'{}' not parseable as {}", cell.token, strategy);
                continue;
            };

            match self.grid.non_empty(row, col) {
                Some(value) => {
                    log::debug!(
                        "{}: found {:?} at {}{} via {}",
                        cell.token,
                        value,
                        column_letters(col),
                        row + 1,
                        strategy
                    );
                    return Some(value);
                }
                None => {
                    log::debug!(
                        "{}: nothing at {}{} via {}",
                        cell.token,
                        column_letters(col),
                        row + 1,
                        strategy
                    );
                }
            }
        }

        None
    }

    /// Find the first cell in the window whose text contains the label
    ///
    /// Returns the 0-based (row, col) of the caption cell.
    pub fn find_label(&self, query: &LabelQuery) -> Option<(usize, usize)> {
        let rows = query.rows.resolve(self.grid.height());
        let columns = query.columns.start..query.columns.end.min(self.grid.width());

        for row in rows {
            for col in columns.clone() {
                if self
                    .grid
                    .text(row, col)
                    .is_some_and(|text| text.contains(query.label))
                {
                    log::debug!("Found label '{}' at row {}", query.label, row);
                    return Some((row, col));
                }
            }
        }

        log::debug!("Label '{}' not found", query.label);
        None
    }

    /// Read a non-empty value at `row_offset` rows below the caption, in `col`
    pub fn value_after_label(
        &self,
        query: &LabelQuery,
        row_offset: usize,
        col: usize,
    ) -> Option<&'a CellValue> {
        let (row, _) = self.find_label(query)?;
        self.grid.non_empty(row + row_offset, col)
    }
}
