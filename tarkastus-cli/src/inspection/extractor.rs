//! Per-file extraction: load the first sheet, run the strategies, merge

use std::path::Path;

use super::record::InspectionRecord;
use super::strategy::{ExtractionStrategy, PartialRecord};
use crate::excel::SheetGrid;

/// Extract an inspection record from a file on disk
///
/// Never fails: problems opening or reading the file end up in
/// [`InspectionRecord::error`].
pub fn extract_inspection_file(path: &Path) -> InspectionRecord {
    let filename = display_name(path);
    log::info!("Extracting data from inspection file: {}", filename);

    match SheetGrid::open_first_sheet(path) {
        Ok(grid) => extract_from_grid(&grid, filename),
        Err(e) => {
            log::error!("Error extracting data from file {}: {:#}", path.display(), e);
            InspectionRecord::failed(filename, format!("{:#}", e))
        }
    }
}

/// Extract from in-memory spreadsheet bytes
#[cfg(test)]
pub fn extract_inspection_bytes(bytes: Vec<u8>, filename: &str) -> InspectionRecord {
    log::info!("Extracting data from inspection upload: {}", filename);

    match SheetGrid::first_sheet_from_bytes(bytes) {
        Ok(grid) => extract_from_grid(&grid, filename),
        Err(e) => {
            log::error!("Error extracting data from {}: {:#}", filename, e);
            InspectionRecord::failed(filename, format!("{:#}", e))
        }
    }
}

/// Run coordinate extraction, falling back to label search
///
/// A sufficient coordinate pass wins field by field; the label pass only
/// fills what the template cells left empty. An insufficient coordinate pass
/// is discarded.
pub fn extract_from_grid(grid: &SheetGrid, filename: impl Into<String>) -> InspectionRecord {
    let filename = filename.into();
    log::debug!(
        "Sheet for {} loaded: {} rows x {} columns",
        filename,
        grid.height(),
        grid.width()
    );

    let coordinate = ExtractionStrategy::Coordinate.extract(grid);
    let label = ExtractionStrategy::Label.extract(grid);

    let merged: PartialRecord = if coordinate.is_sufficient() {
        coordinate.or(label)
    } else {
        log::debug!("Coordinate extraction found nothing usable in {}, using labels", filename);
        label
    };

    let record = merged.into_record(filename);
    log::info!(
        "Data extraction completed for file: {} (serial {:?}, model {:?})",
        record.filename,
        record.serial_number,
        record.model
    );
    record
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
