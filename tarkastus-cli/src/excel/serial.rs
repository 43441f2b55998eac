//! Excel date serial numbers (1900 date system)

use chrono::{NaiveDate, NaiveDateTime};

/// Number format applied to date cells written back into the registry
pub const DATE_NUMBER_FORMAT: &str = "DD.MM.YYYY";

/// Day zero of the 1900 date system, shifted to absorb the 1900 leap-year bug
fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Convert a timestamp to the serial Excel stores in date cells
pub fn to_excel_serial(dt: &NaiveDateTime) -> f64 {
    let delta = *dt - epoch();
    delta.num_milliseconds() as f64 / 86_400_000.0
}
