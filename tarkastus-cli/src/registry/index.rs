//! Serial-number lookup over the registry table

use std::collections::HashMap;

use super::columns::{DEVICE_NAME, SERIAL_NUMBER};
use super::table::RegistryTable;
use crate::excel::CellValue;

/// Rows grouped by serial number, in table order
#[derive(Debug, Clone, Default)]
pub struct RegistryIndex {
    by_serial: HashMap<String, Vec<usize>>,
}

impl RegistryIndex {
    pub fn build(table: &RegistryTable) -> Self {
        let mut index = Self::default();
        for row in 0..table.len() {
            if let Some(serial) = table.value(row, SERIAL_NUMBER).and_then(CellValue::to_text) {
                index.insert(serial, row);
            }
        }
        log::debug!("Indexed {} distinct serial numbers", index.by_serial.len());
        index
    }

    pub fn insert(&mut self, serial: String, row: usize) {
        self.by_serial.entry(serial).or_default().push(row);
    }

    /// First row with this serial whose model does not contradict `model`
    ///
    /// A blank serial never matches. Models only disagree when both sides
    /// are non-blank and differ; the search then moves to the next row with
    /// the same serial. Models are read from the table so updates made
    /// during the run are seen.
    pub fn find(&self, table: &RegistryTable, serial: &str, model: Option<&str>) -> Option<usize> {
        if serial.is_empty() {
            log::debug!("No serial number provided, device will be considered new");
            return None;
        }

        let candidates = self.by_serial.get(serial)?;
        let model = model.filter(|m| !m.is_empty());

        for &row in candidates {
            let row_model = table.value(row, DEVICE_NAME).and_then(CellValue::to_text);
            match (row_model.as_deref(), model) {
                (Some(existing), Some(wanted)) if existing != wanted => {
                    log::debug!(
                        "Serial {} matched row {} but model '{}' != '{}'",
                        serial,
                        row,
                        existing,
                        wanted
                    );
                }
                _ => {
                    log::debug!("Device {} found at row {}", serial, row);
                    return Some(row);
                }
            }
        }

        None
    }
}
