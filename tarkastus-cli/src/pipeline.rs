//! One batch run: validate, extract, reconcile, write

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::Config;
use crate::error::PipelineError;
use crate::inspection::{InspectionRecord, extract_inspection_file};
use crate::registry::{RegistryWorkbook, RegistryWriter, WriteStrategy, load_registry, reconcile};
use crate::report::{ProcessingResult, StatusSummary};

/// Everything a caller needs to report on a run
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: Uuid,
    /// `None` when the run failed at registry level
    pub output_path: Option<PathBuf>,
    pub results: Vec<ProcessingResult>,
    pub write_strategy: Option<WriteStrategy>,
}

impl RunOutcome {
    fn failed(run_id: Uuid, error: &PipelineError) -> Self {
        log::error!("[{}] {}", run_id, error);
        Self {
            run_id,
            output_path: None,
            results: vec![ProcessingResult::run_failure(error.to_string())],
            write_strategy: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.output_path.is_some()
    }

    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_results(&self.results)
    }
}

enum Slot {
    Rejected(ProcessingResult),
    Extracted(InspectionRecord),
}

/// Update the registry at `registry_path` with the given inspection files
///
/// Per-file problems are reported in the results and never stop the batch.
/// Registry-level problems end the run with a single result for `"N/A"`.
pub fn update_registry(
    registry_path: &Path,
    inspection_files: &[PathBuf],
    config: &Config,
) -> RunOutcome {
    let run_id = Uuid::new_v4();
    log::info!(
        "[{}] Updating customer registry {} with {} inspection file(s)",
        run_id,
        registry_path.display(),
        inspection_files.len()
    );

    let slots: Vec<Slot> = inspection_files
        .iter()
        .map(|path| {
            if config.is_accepted(path) {
                Slot::Extracted(extract_inspection_file(path))
            } else {
                log::warn!("Skipping {}: file not found or not a spreadsheet", path.display());
                Slot::Rejected(ProcessingResult::error(
                    path.display().to_string(),
                    "file not found or not a spreadsheet",
                ))
            }
        })
        .collect();

    let records: Vec<InspectionRecord> = slots
        .iter()
        .filter_map(|slot| match slot {
            Slot::Extracted(record) => Some(record.clone()),
            Slot::Rejected(_) => None,
        })
        .collect();

    if records.is_empty() {
        let mut outcome = RunOutcome::failed(run_id, &PipelineError::NoInspectionFiles);
        let mut results: Vec<ProcessingResult> = slots
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Rejected(result) => Some(result),
                Slot::Extracted(_) => None,
            })
            .collect();
        results.append(&mut outcome.results);
        outcome.results = results;
        return outcome;
    }

    let RegistryWorkbook {
        table,
        sheet_name,
        sheet_order,
        book,
    } = match load_registry(registry_path, &config.registry_sheet) {
        Ok(registry) => registry,
        Err(e) => return RunOutcome::failed(run_id, &e),
    };

    let (table, mut merged) = reconcile(table, &records);

    let writer = RegistryWriter::new(&sheet_name, &sheet_order, book);
    let strategy = match writer.write(&table, &config.output_path) {
        Ok(strategy) => strategy,
        Err(e) => return RunOutcome::failed(run_id, &e),
    };

    // Put reconciliation results back between the rejected files
    merged.reverse();
    let results: Vec<ProcessingResult> = slots
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Rejected(result) => Some(result),
            Slot::Extracted(_) => merged.pop(),
        })
        .collect();

    let outcome = RunOutcome {
        run_id,
        output_path: Some(config.output_path.clone()),
        results,
        write_strategy: Some(strategy),
    };
    log::info!(
        "[{}] Registry saved to {} ({} save): {}",
        run_id,
        config.output_path.display(),
        strategy,
        outcome.summary()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::CellValue;
    use crate::registry::columns::*;
    use crate::report::Status;
    use rust_xlsxwriter::Workbook;

    struct Fixture {
        paths: Vec<PathBuf>,
    }

    impl Fixture {
        fn new() -> Self {
            Self { paths: Vec::new() }
        }

        fn path(&mut self, prefix: &str, ext: &str) -> PathBuf {
            let path = std::env::temp_dir().join(format!("{}_{}.{}", prefix, Uuid::new_v4(), ext));
            self.paths.push(path.clone());
            path
        }

        fn registry(&mut self) -> PathBuf {
            let path = self.path("rekisteri", "xlsx");
            let mut workbook = Workbook::new();
            let sheet = workbook.add_worksheet();
            sheet.set_name("Kaikki").unwrap();
            let header = [
                ACTIVE,
                CUSTOMER,
                DEVICE_NAME,
                SERIAL_NUMBER,
                INSPECTED,
                NEXT_INSPECTION,
                NOTES,
                INSPECTION_REPORT,
            ];
            for (col, name) in header.iter().enumerate() {
                sheet.write_string(0, col as u16, *name).unwrap();
            }
            sheet.write_boolean(1, 0, true).unwrap();
            sheet.write_string(1, 1, "Vanha Oy").unwrap();
            sheet.write_string(1, 2, "CraneX").unwrap();
            sheet.write_string(1, 3, "SN001").unwrap();
            sheet.write_string(1, 4, "01.02.2023").unwrap();
            sheet.write_string(1, 6, "Koukku vaihdettu").unwrap();
            workbook.save(&path).unwrap();
            path
        }

        fn inspection(&mut self, serial: &str, model: &str, date: &str) -> PathBuf {
            let path = self.path("tarkastus", "xlsx");
            let mut workbook = Workbook::new();
            let sheet = workbook.add_worksheet();
            sheet.write_string(5, 24, "Työmaa Oy").unwrap();
            sheet.write_string(5, 29, date).unwrap();
            sheet.write_string(10, 5, model).unwrap();
            sheet.write_string(11, 6, serial).unwrap();
            workbook.save(&path).unwrap();
            path
        }

        fn config(&mut self) -> Config {
            Config {
                output_path: self.path("Asiakasrekisteri_updated", "xlsx"),
                ..Config::default()
            }
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            for path in &self.paths {
                let _ = std::fs::remove_file(path);
            }
        }
    }

    fn reload(config: &Config) -> crate::registry::table::RegistryTable {
        load_registry(&config.output_path, "Kaikki").unwrap().table
    }

    #[test]
    fn test_matching_inspection_updates_row() {
        let mut fx = Fixture::new();
        let registry = fx.registry();
        let inspection = fx.inspection("SN001", "CraneX", "12.03.2024 / Helsinki");
        let config = fx.config();

        let outcome = update_registry(&registry, &[inspection], &config);

        assert!(outcome.is_success());
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].status, Status::Updated);
        assert_eq!(outcome.write_strategy, Some(WriteStrategy::PreserveStructure));

        let table = reload(&config);
        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, INSPECTED), Some(&CellValue::from("12.03.2024")));
        assert_eq!(table.value(0, NEXT_INSPECTION), Some(&CellValue::from("01.03.2025")));
        assert_eq!(table.value(0, CUSTOMER), Some(&CellValue::from("Työmaa Oy")));
        assert_eq!(table.value(0, NOTES), Some(&CellValue::from("Koukku vaihdettu")));
    }

    #[test]
    fn test_unknown_serial_adds_row() {
        let mut fx = Fixture::new();
        let registry = fx.registry();
        let inspection = fx.inspection("SN999", "HoistY", "05.06.2024");
        let config = fx.config();

        let outcome = update_registry(&registry, &[inspection], &config);

        assert_eq!(outcome.results[0].status, Status::Added);
        let table = reload(&config);
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(1, SERIAL_NUMBER), Some(&CellValue::from("SN999")));
        assert_eq!(table.value(1, NOTES), Some(&CellValue::Empty));
        assert_eq!(table.value(0, SERIAL_NUMBER), Some(&CellValue::from("SN001")));
    }

    #[test]
    fn test_rejected_files_keep_their_place() {
        let mut fx = Fixture::new();
        let registry = fx.registry();
        let notes = fx.path("muistiinpanot", "txt");
        std::fs::write(&notes, "ei taulukko").unwrap();
        let first = fx.inspection("SN001", "CraneX", "12.03.2024");
        let second = fx.inspection("SN500", "HoistY", "12.03.2024");
        let config = fx.config();

        let outcome = update_registry(&registry, &[first, notes.clone(), second], &config);

        let statuses: Vec<Status> = outcome.results.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![Status::Updated, Status::Error, Status::Added]);
        assert_eq!(outcome.results[1].filename, notes.display().to_string());
        assert_eq!(
            outcome.summary(),
            StatusSummary {
                added: 1,
                updated: 1,
                errors: 1
            }
        );
    }

    #[test]
    fn test_empty_inspection_is_single_error() {
        let mut fx = Fixture::new();
        let registry = fx.registry();
        let blank = fx.path("tyhja", "xlsx");
        let mut workbook = Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "Tarkastuspöytäkirja").unwrap();
        workbook.save(&blank).unwrap();
        let config = fx.config();

        let outcome = update_registry(&registry, &[blank.clone()], &config);

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].status, Status::Error);
        assert_eq!(
            outcome.results[0].filename,
            blank.file_name().unwrap().to_string_lossy()
        );
        // Registry itself is still written unchanged
        assert_eq!(reload(&config).len(), 1);
    }

    #[test]
    fn test_missing_registry_is_run_failure() {
        let mut fx = Fixture::new();
        let missing = fx.path("puuttuva_rekisteri", "xlsx");
        let inspection = fx.inspection("SN001", "CraneX", "12.03.2024");
        let config = fx.config();

        let outcome = update_registry(&missing, &[inspection], &config);

        assert!(!outcome.is_success());
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].filename, "N/A");
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_wrong_sheet_is_run_failure() {
        let mut fx = Fixture::new();
        let registry = fx.registry();
        let inspection = fx.inspection("SN001", "CraneX", "12.03.2024");
        let config = Config {
            registry_sheet: "Asiakkaat".into(),
            ..fx.config()
        };

        let outcome = update_registry(&registry, &[inspection], &config);

        assert!(!outcome.is_success());
        assert!(
            outcome.results[0]
                .message
                .as_deref()
                .unwrap()
                .contains("Asiakkaat")
        );
    }

    #[test]
    fn test_no_valid_inspection_files() {
        let mut fx = Fixture::new();
        let registry = fx.registry();
        let missing = fx.path("ei_ole", "xlsx");
        let config = fx.config();

        let outcome = update_registry(&registry, &[missing], &config);

        assert!(!outcome.is_success());
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[1].filename, "N/A");
        assert!(!config.output_path.exists());
    }
}
