//! In-memory copy of the registry sheet

use crate::excel::{CellValue, SheetGrid};

/// Header plus data rows of the registry sheet
///
/// Columns are identified by the header text. Every row has exactly
/// `columns.len()` cells; `CellValue::Empty` is null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RegistryTable {
    #[cfg(test)]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Row 0 of the grid is the header; trailing blank rows are dropped
    pub fn from_grid(grid: &SheetGrid) -> Self {
        let Some((header, body)) = grid.rows().split_first() else {
            return Self::default();
        };

        let columns: Vec<String> = header
            .iter()
            .map(|cell| cell.to_text().unwrap_or_default())
            .collect();

        let mut rows: Vec<Vec<CellValue>> = body.to_vec();
        while rows
            .last()
            .is_some_and(|row| row.iter().all(CellValue::is_empty))
        {
            rows.pop();
        }

        log::debug!(
            "Registry table: {} columns, {} data rows",
            columns.len(),
            rows.len()
        );
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` under the named column
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Overwrite a cell; returns false when the column or row is unknown
    pub fn set(&mut self, row: usize, column: &str, value: CellValue) -> bool {
        let Some(col) = self.column_index(column) else {
            return false;
        };
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Append a row with every column null and return its index
    pub fn push_empty_row(&mut self) -> usize {
        self.rows.push(vec![CellValue::Empty; self.columns.len()]);
        self.rows.len() - 1
    }
}
