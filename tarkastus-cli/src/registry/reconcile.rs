//! Merging inspection records into the registry table

use super::columns::registry_values;
use super::index::RegistryIndex;
use super::table::RegistryTable;
use crate::inspection::InspectionRecord;
use crate::report::ProcessingResult;

/// Owns the registry table for the duration of one run
pub struct Reconciler {
    table: RegistryTable,
    index: RegistryIndex,
}

impl Reconciler {
    pub fn new(table: RegistryTable) -> Self {
        let index = RegistryIndex::build(&table);
        Self { table, index }
    }

    /// Update or insert one record
    pub fn apply(&mut self, record: &InspectionRecord) -> ProcessingResult {
        log::debug!("Processing inspection data for file: {}", record.filename);

        if let Some(error) = &record.error {
            log::warn!("Error in inspection data for {}: {}", record.filename, error);
            return ProcessingResult::error(&record.filename, format!("Extraction failed: {}", error));
        }
        if !record.has_meaningful_data() {
            log::warn!("No meaningful data extracted from {}", record.filename);
            return ProcessingResult::error(&record.filename, "Extraction failed: no meaningful data");
        }

        let serial = record.serial_number.as_deref().unwrap_or("");
        let found = self.index.find(&self.table, serial, record.model.as_deref());
        let values = registry_values(record);

        let result = match found {
            Some(row) => {
                for (column, value) in values {
                    if let Some(value) = value {
                        self.table.set(row, column, value);
                    }
                }
                ProcessingResult::updated(record)
            }
            None => {
                let row = self.table.push_empty_row();
                for (column, value) in values {
                    if let Some(value) = value {
                        self.table.set(row, column, value);
                    }
                }
                if !serial.is_empty() {
                    self.index.insert(serial.to_string(), row);
                }
                ProcessingResult::added(record)
            }
        };

        log::info!(
            "Device processed - Status: {}, Serial: {}, Model: {}",
            result.status,
            serial,
            record.model.as_deref().unwrap_or("")
        );
        result
    }

    pub fn finish(self) -> RegistryTable {
        self.table
    }
}

/// Reconcile a batch; results follow input order
pub fn reconcile(
    table: RegistryTable,
    records: &[InspectionRecord],
) -> (RegistryTable, Vec<ProcessingResult>) {
    let mut reconciler = Reconciler::new(table);
    let results = records.iter().map(|r| reconciler.apply(r)).collect();
    (reconciler.finish(), results)
}
