//! Loading the registry workbook
//!
//! Values are read with calamine. The same bytes are also parsed by
//! umya-spreadsheet so the writer can edit the original document in place;
//! when that parse fails (e.g. legacy `.xls`) only the plain writer is used.

use std::io::Cursor;
use std::path::Path;

use calamine::{Reader, open_workbook_auto_from_rs};
use umya_spreadsheet::Spreadsheet;

use super::table::RegistryTable;
use crate::error::PipelineError;
use crate::excel::SheetGrid;

/// Loaded registry plus what the writer needs to preserve structure
pub struct RegistryWorkbook {
    pub table: RegistryTable,
    pub sheet_name: String,
    /// Sheet names in workbook order at load time
    pub sheet_order: Vec<String>,
    /// Editable document, absent when the file could not be parsed for editing
    pub book: Option<Spreadsheet>,
}

impl std::fmt::Debug for RegistryWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryWorkbook")
            .field("sheet_name", &self.sheet_name)
            .field("sheet_order", &self.sheet_order)
            .field("rows", &self.table.len())
            .field("editable", &self.book.is_some())
            .finish()
    }
}

pub fn load_registry(path: &Path, sheet_name: &str) -> Result<RegistryWorkbook, PipelineError> {
    log::info!("Loading customer registry: {}", path.display());

    if !path.is_file() {
        log::error!("Customer registry file not found: {}", path.display());
        return Err(PipelineError::RegistryNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| PipelineError::RegistryLoad {
        message: format!("cannot read {}: {}", path.display(), e),
    })?;

    load_registry_bytes(bytes, sheet_name)
}

pub fn load_registry_bytes(
    bytes: Vec<u8>,
    sheet_name: &str,
) -> Result<RegistryWorkbook, PipelineError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.clone())).map_err(|e| {
        PipelineError::RegistryLoad {
            message: format!("cannot open workbook: {}", e),
        }
    })?;

    let sheet_order = workbook.sheet_names();
    log::debug!("Workbook loaded. Available sheets: {:?}", sheet_order);

    if !sheet_order.iter().any(|name| name == sheet_name) {
        log::error!("Required sheet '{}' not found in registry file", sheet_name);
        return Err(PipelineError::MissingSheet {
            sheet: sheet_name.to_string(),
        });
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| PipelineError::RegistryLoad {
            message: format!("cannot read sheet '{}': {}", sheet_name, e),
        })?;
    let table = RegistryTable::from_grid(&SheetGrid::from_range(&range));
    log::info!(
        "Read {} data rows from registry sheet '{}'",
        table.len(),
        sheet_name
    );

    let book = match umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true) {
        Ok(book) => Some(book),
        Err(e) => {
            log::warn!(
                "Registry cannot be edited in place ({}); it will be rewritten without formatting",
                e
            );
            None
        }
    };

    Ok(RegistryWorkbook {
        table,
        sheet_name: sheet_name.to_string(),
        sheet_order,
        book,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::CellValue;
    use rust_xlsxwriter::Workbook;
    use uuid::Uuid;

    fn registry_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let info = workbook.add_worksheet();
        info.set_name("Ohje").unwrap();
        info.write_string(0, 0, "Rekisterin ohje").unwrap();

        let sheet = workbook.add_worksheet();
        sheet.set_name("Kaikki").unwrap();
        sheet.write_string(0, 0, "Aktiivinen").unwrap();
        sheet.write_string(0, 1, "Laitteen nimi").unwrap();
        sheet.write_string(0, 2, "Laitteen sarjanumero").unwrap();
        sheet.write_boolean(1, 0, true).unwrap();
        sheet.write_string(1, 1, "CraneX").unwrap();
        sheet.write_string(1, 2, "SN001").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_loads_named_sheet() {
        let registry = load_registry_bytes(registry_bytes(), "Kaikki").unwrap();

        assert_eq!(registry.sheet_order, vec!["Ohje", "Kaikki"]);
        assert_eq!(registry.table.len(), 1);
        assert_eq!(
            registry.table.value(0, "Laitteen sarjanumero"),
            Some(&CellValue::from("SN001"))
        );
        assert!(registry.book.is_some());
    }

    #[test]
    fn test_missing_sheet_is_fatal() {
        let err = load_registry_bytes(registry_bytes(), "Asiakkaat").unwrap_err();
        assert!(matches!(err, PipelineError::MissingSheet { .. }));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let path = std::env::temp_dir().join(format!("rekisteri_{}.xlsx", Uuid::new_v4()));
        let err = load_registry(&path, "Kaikki").unwrap_err();
        assert!(matches!(err, PipelineError::RegistryNotFound { .. }));
    }

    #[test]
    fn test_unreadable_bytes() {
        let err = load_registry_bytes(b"plain text".to_vec(), "Kaikki").unwrap_err();
        assert!(matches!(err, PipelineError::RegistryLoad { .. }));
    }
}
