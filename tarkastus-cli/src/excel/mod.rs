//! Spreadsheet access shared by the inspection and registry sides

pub mod grid;
pub mod locator;
pub mod serial;

pub use grid::{CellValue, SheetGrid};
pub use locator::{CellLocator, CellRef, LabelQuery, RowWindow, column_letters};
