//! Label-based extraction: locate printed captions, read values at fixed offsets

use super::dates::parse_date;
use super::record::InspectionResult;
use super::strategy::PartialRecord;
use crate::excel::{CellLocator, CellValue, LabelQuery, RowWindow, SheetGrid};

const INSPECTION_DATE_LABEL: &str = "Paikka ja pvm";
const NEXT_INSPECTION_LABEL: &str = "Seuraava määräaikaistarkastus";
const DEVICE_HEADER_LABEL: &str = "NOSTIMEN PERUSTIEDOT";
const RESULT_HEADER_LABEL: &str = "PUUTTEET JA HUOMAUTUKSET";

/// Column holding the values printed on the right half of the form
const VALUE_COLUMN: usize = 18;
/// Column holding model and serial number in the device block
const DEVICE_VALUE_COLUMN: usize = 2;
/// Column with the free-text verdict under the result header
const RESULT_TEXT_COLUMN: usize = 15;

/// Rows (from the top) searched for the inspection type
const INSPECTION_TYPE_ROWS: usize = 3;

pub fn extract(grid: &SheetGrid) -> PartialRecord {
    let locator = CellLocator::new(grid);

    let inspection_type = (0..INSPECTION_TYPE_ROWS)
        .find_map(|row| grid.non_empty(row, VALUE_COLUMN))
        .and_then(CellValue::to_text);

    let inspection_date = locator
        .value_after_label(
            &LabelQuery::in_column(INSPECTION_DATE_LABEL, RowWindow::Rows(5..10), 16),
            0,
            VALUE_COLUMN,
        )
        .and_then(parse_date);

    let next_inspection_date = locator
        .value_after_label(
            &LabelQuery::in_column(NEXT_INSPECTION_LABEL, RowWindow::Tail(10), 15),
            0,
            VALUE_COLUMN,
        )
        .and_then(parse_date);

    let device = LabelQuery::in_column(DEVICE_HEADER_LABEL, RowWindow::Rows(10..20), 0);
    let device_text = |offset: usize, col: usize| {
        locator
            .value_after_label(&device, offset, col)
            .and_then(CellValue::to_text)
    };

    let partial = PartialRecord {
        inspection_type,
        inspection_date,
        next_inspection_date,
        kympitys_date: None,
        manufacturer: device_text(1, VALUE_COLUMN),
        model: device_text(2, DEVICE_VALUE_COLUMN),
        serial_number: device_text(3, DEVICE_VALUE_COLUMN),
        owner: device_text(2, VALUE_COLUMN),
        owner_address: device_text(3, VALUE_COLUMN),
        inspection_result: inspection_result(&locator),
    };

    log::debug!("Label extraction: {:?}", partial);
    partial
}

/// Verdict from the row below the findings header
///
/// A checkbox marked with 1 wins over any free text.
fn inspection_result(locator: &CellLocator<'_>) -> Option<InspectionResult> {
    let query = LabelQuery::in_column(RESULT_HEADER_LABEL, RowWindow::Tail(30), 0);
    let (header_row, _) = locator.find_label(&query)?;
    let grid = locator.grid();
    let row = header_row + 1;
    if row >= grid.height() {
        return None;
    }

    let checkboxes = [
        (0, InspectionResult::Serviceable),
        (1, InspectionResult::NeedsRepair),
        (2, InspectionResult::NotServiceable),
    ];
    for (col, result) in checkboxes {
        if grid.get(row, col).is_some_and(is_checked) {
            log::debug!("Result: {} (column {})", result, col);
            return Some(result);
        }
    }

    let text = grid.non_empty(row, RESULT_TEXT_COLUMN)?.to_string().to_lowercase();
    let result = if text.contains("ei ole käyttökunnossa") {
        InspectionResult::NotServiceable
    } else if text.contains("käyttökunnossa") {
        InspectionResult::Serviceable
    } else if text.contains("korjattava") {
        InspectionResult::NeedsRepair
    } else {
        return None;
    };
    log::debug!("Result from text: {}", result);
    Some(result)
}

fn is_checked(value: &CellValue) -> bool {
    match value {
        CellValue::Number(n) => *n == 1.0,
        CellValue::Bool(b) => *b,
        CellValue::Text(s) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true")
        }
        _ => false,
    }
}
