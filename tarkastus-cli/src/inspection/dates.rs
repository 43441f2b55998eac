//! Date parsing and normalisation for inspection forms

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::excel::CellValue;

/// Format used for every date stored in the registry
pub const REGISTRY_DATE_FORMAT: &str = "%d.%m.%Y";

const GENERIC_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
    "%Y.%m.%d",
];

const GENERIC_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

/// Read a date out of a cell
///
/// Native date cells are taken as-is, strings go through [`parse_date_str`].
/// Anything else yields `None`.
pub fn parse_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(s) => parse_date_str(s),
        _ => None,
    }
}

/// Parse `dd.mm.yyyy[/ trailing text]`, then fall back to common formats
pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let parsed = parse_finnish_date(s).or_else(|| parse_generic_date(s));
    if parsed.is_none() {
        log::debug!("Could not parse date from '{}'", s);
    }
    parsed
}

/// `12.03.2024 / Helsinki` → 2024-03-12
fn parse_finnish_date(s: &str) -> Option<NaiveDate> {
    let date_part = s.split('/').next()?.trim();
    if !date_part.contains('.') {
        return None;
    }

    let parts: Vec<&str> = date_part.split('.').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }

    // Day may be preceded by a place name, year may be followed by text
    let day: u32 = trailing_digits(parts[0])?.parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = leading_digits(parts[2])?.parse().ok()?;
    if !(1000..=9999).contains(&year) {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_generic_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();

    GENERIC_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            GENERIC_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn leading_digits(s: &str) -> Option<&str> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 { None } else { Some(&s[..end]) }
}

fn trailing_digits(s: &str) -> Option<&str> {
    let start = s
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    if start == s.len() { None } else { Some(&s[start..]) }
}

/// First day of the inspection month, one year later
pub fn next_inspection_from(inspection_date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(inspection_date.year() + 1, inspection_date.month(), 1)
}

/// Build the re-certification date from separate year and month cells
///
/// Valid only when the year is an integer and the month is 1..=12; other
/// combinations are dropped without error.
pub fn kympitys_date(year: &CellValue, month: &CellValue) -> Option<NaiveDate> {
    let year = whole_number(year)?;
    let month = whole_number(month)?;

    if !(1..=12).contains(&month) {
        log::debug!("Ignoring kympitys month {}", month);
        return None;
    }

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month as u32, 1)
}

fn whole_number(value: &CellValue) -> Option<i64> {
    match value {
        CellValue::Number(n) if n.fract() == 0.0 => Some(*n as i64),
        CellValue::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

/// Render a date the way the registry stores it
pub fn format_registry_date(date: NaiveDate) -> String {
    date.format(REGISTRY_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_finnish_date_with_trailing_text() {
        assert_eq!(parse_date_str("12.03.2024 / Helsinki"), Some(ymd(2024, 3, 12)));
        assert_eq!(parse_date_str("1.6.2025/Tampere"), Some(ymd(2025, 6, 1)));
        assert_eq!(parse_date_str("12.03.2024"), Some(ymd(2024, 3, 12)));
        assert_eq!(parse_date_str("Espoo 5.11.2023"), Some(ymd(2023, 11, 5)));
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(parse_date_str("2024-03-12"), Some(ymd(2024, 3, 12)));
        assert_eq!(parse_date_str("2024-03-12 10:30:00"), Some(ymd(2024, 3, 12)));
        assert_eq!(parse_date_str("12/03/2024"), Some(ymd(2024, 3, 12)));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_date_str(""), None);
        assert_eq!(parse_date_str("ei tiedossa"), None);
        assert_eq!(parse_date_str("32.01.2024"), None);
        assert_eq!(parse_date(&CellValue::Number(45292.0)), None);
        assert_eq!(parse_date(&CellValue::Empty), None);
    }

    #[test]
    fn test_native_date_cell() {
        let dt = ymd(2024, 3, 12).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_date(&CellValue::DateTime(dt)), Some(ymd(2024, 3, 12)));
    }

    #[test]
    fn test_next_inspection_is_first_of_month_next_year() {
        assert_eq!(next_inspection_from(ymd(2024, 3, 12)), Some(ymd(2025, 3, 1)));
        assert_eq!(next_inspection_from(ymd(2024, 2, 29)), Some(ymd(2025, 2, 1)));
        assert_eq!(next_inspection_from(ymd(2024, 12, 31)), Some(ymd(2025, 12, 1)));
    }

    #[test]
    fn test_kympitys_date() {
        assert_eq!(
            kympitys_date(&CellValue::Number(2025.0), &CellValue::Number(6.0)),
            Some(ymd(2025, 6, 1))
        );
        assert_eq!(
            kympitys_date(&CellValue::from("2025"), &CellValue::from(" 6 ")),
            Some(ymd(2025, 6, 1))
        );
        assert_eq!(
            kympitys_date(&CellValue::Number(2025.0), &CellValue::Number(13.0)),
            None
        );
        assert_eq!(
            kympitys_date(&CellValue::Number(2025.0), &CellValue::Number(0.0)),
            None
        );
        assert_eq!(
            kympitys_date(&CellValue::from("vuosi"), &CellValue::Number(6.0)),
            None
        );
        assert_eq!(
            kympitys_date(&CellValue::Number(2025.0), &CellValue::from("kesäkuu")),
            None
        );
        assert_eq!(
            kympitys_date(&CellValue::Number(2025.5), &CellValue::Number(6.0)),
            None
        );
    }

    #[test]
    fn test_registry_format() {
        assert_eq!(format_registry_date(ymd(2025, 3, 1)), "01.03.2025");
    }
}
