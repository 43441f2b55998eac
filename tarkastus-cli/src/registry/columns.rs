//! Registry column names and the record-to-column mapping

use crate::excel::CellValue;
use crate::inspection::InspectionRecord;
use crate::inspection::dates::format_registry_date;

pub const ACTIVE: &str = "Aktiivinen";
pub const CUSTOMER: &str = "Tilaaja";
pub const CUSTOMER_DEVICE: &str = "Tilaajan laite";
pub const DEVICE_NAME: &str = "Laitteen nimi";
pub const SERIAL_NUMBER: &str = "Laitteen sarjanumero";
pub const INSPECTED: &str = "Tarkastettu";
pub const NEXT_INSPECTION: &str = "Seuraava tarkastus";
pub const NEXT_KYMPITYS: &str = "Seuraava kympitys";
pub const SERVICED: &str = "Huollettu/korjattu";
pub const WORKSITE: &str = "Työmaa";
pub const ADDRESS: &str = "Osoite";
pub const NOTES: &str = "Lisätieto";
pub const BILLING_1: &str = "Verkkolaskutus1";
pub const BILLING_2: &str = "Verkkolaskutus2";
pub const PAYMENT_TERMS: &str = "Maksuehto";
pub const INSPECTION_REPORT: &str = "Tarkastuspöytäkirja";

/// Values an inspection contributes to its registry row
///
/// `None` means "no value": an update leaves the cell alone, an insert leaves
/// it null. The always-`None` columns are never populated by this tool.
pub fn registry_values(record: &InspectionRecord) -> Vec<(&'static str, Option<CellValue>)> {
    let text = |value: &Option<String>| value.clone().map(CellValue::Text);
    let date = |value: Option<chrono::NaiveDate>| {
        value.map(|d| CellValue::Text(format_registry_date(d)))
    };

    vec![
        (ACTIVE, Some(CellValue::Bool(true))),
        (CUSTOMER, text(&record.owner)),
        (CUSTOMER_DEVICE, None),
        (DEVICE_NAME, text(&record.model)),
        (SERIAL_NUMBER, text(&record.serial_number)),
        (INSPECTED, date(record.inspection_date)),
        (NEXT_INSPECTION, date(record.next_inspection_date)),
        (NEXT_KYMPITYS, date(record.kympitys_date)),
        (SERVICED, None),
        (WORKSITE, text(&record.owner)),
        (ADDRESS, None),
        (NOTES, None),
        (BILLING_1, None),
        (BILLING_2, None),
        (PAYMENT_TERMS, None),
        (INSPECTION_REPORT, Some(CellValue::Text(record.filename.clone()))),
    ]
}
