//! Coordinate-based extraction from the standard report template

use super::dates::{kympitys_date, next_inspection_from, parse_date};
use super::strategy::PartialRecord;
use crate::excel::{CellLocator, CellRef, CellValue, SheetGrid};

/// Template cells (token, then the direct 0-based row/col fallback)
pub mod cells {
    use crate::excel::CellRef;

    pub const MODEL: CellRef = CellRef::new("F-0:11", 10, 5);
    pub const SERIAL_NUMBER: CellRef = CellRef::new("G-0:12", 11, 6);
    pub const INSPECTION_DATE: CellRef = CellRef::new("AD-AG:6", 5, 29);
    /// Worksite, stored as the owner
    pub const OWNER: CellRef = CellRef::new("Y-AB:6", 5, 24);
    pub const KYMPITYS_YEAR: CellRef = CellRef::new("AB-AD:58", 57, 27);
    pub const KYMPITYS_MONTH: CellRef = CellRef::new("Y-Z:58", 57, 24);
}

pub fn extract(grid: &SheetGrid) -> PartialRecord {
    let locator = CellLocator::new(grid);

    let model = text_at(&locator, &cells::MODEL);
    let serial_number = text_at(&locator, &cells::SERIAL_NUMBER);
    let owner = text_at(&locator, &cells::OWNER);

    let inspection_date = locator.resolve(&cells::INSPECTION_DATE).and_then(parse_date);
    let next_inspection_date = inspection_date.and_then(next_inspection_from);

    let kympitys = match (
        locator.resolve(&cells::KYMPITYS_YEAR),
        locator.resolve(&cells::KYMPITYS_MONTH),
    ) {
        (Some(year), Some(month)) => kympitys_date(year, month),
        _ => None,
    };

    log::debug!("Model: {:?}", model);
    log::debug!("Serial number: {:?}", serial_number);
    log::debug!("Owner/worksite: {:?}", owner);
    log::debug!("Inspection date: {:?}", inspection_date);
    log::debug!("Next inspection date: {:?}", next_inspection_date);
    log::debug!("Kympitys date: {:?}", kympitys);

    PartialRecord {
        inspection_date,
        next_inspection_date,
        kympitys_date: kympitys,
        model,
        serial_number,
        owner,
        ..Default::default()
    }
}

fn text_at(locator: &CellLocator<'_>, cell: &CellRef) -> Option<String> {
    locator.resolve(cell).and_then(CellValue::to_text)
}
