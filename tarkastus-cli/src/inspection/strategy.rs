//! Extraction strategies and the partial records they produce

use chrono::NaiveDate;

use super::record::{InspectionRecord, InspectionResult};
use super::{coordinate, label};
use crate::excel::SheetGrid;

/// Inspection type used when the form does not name one
pub const DEFAULT_INSPECTION_TYPE: &str = "Määräaikaistarkastus";

/// Fields found by one strategy; anything it could not locate is `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRecord {
    pub inspection_type: Option<String>,
    pub inspection_date: Option<NaiveDate>,
    pub next_inspection_date: Option<NaiveDate>,
    pub kympitys_date: Option<NaiveDate>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub owner: Option<String>,
    pub owner_address: Option<String>,
    pub inspection_result: Option<InspectionResult>,
}

impl PartialRecord {
    /// At least one of model, serial number or inspection date was found
    pub fn is_sufficient(&self) -> bool {
        self.model.is_some() || self.serial_number.is_some() || self.inspection_date.is_some()
    }

    /// Merge by field presence: fields already set here win
    pub fn or(self, other: PartialRecord) -> PartialRecord {
        PartialRecord {
            inspection_type: self.inspection_type.or(other.inspection_type),
            inspection_date: self.inspection_date.or(other.inspection_date),
            next_inspection_date: self.next_inspection_date.or(other.next_inspection_date),
            kympitys_date: self.kympitys_date.or(other.kympitys_date),
            manufacturer: self.manufacturer.or(other.manufacturer),
            model: self.model.or(other.model),
            serial_number: self.serial_number.or(other.serial_number),
            owner: self.owner.or(other.owner),
            owner_address: self.owner_address.or(other.owner_address),
            inspection_result: self.inspection_result.or(other.inspection_result),
        }
    }

    pub fn into_record(self, filename: impl Into<String>) -> InspectionRecord {
        InspectionRecord {
            inspection_type: self
                .inspection_type
                .unwrap_or_else(|| DEFAULT_INSPECTION_TYPE.to_string()),
            inspection_date: self.inspection_date,
            next_inspection_date: self.next_inspection_date,
            kympitys_date: self.kympitys_date,
            manufacturer: self.manufacturer,
            model: self.model,
            serial_number: self.serial_number,
            owner: self.owner,
            owner_address: self.owner_address,
            inspection_result: self.inspection_result.unwrap_or_default(),
            filename: filename.into(),
            error: None,
        }
    }
}

/// Ways of reading an inspection sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Fixed template coordinates (preferred)
    Coordinate,
    /// Caption search with fixed offsets
    Label,
}

impl ExtractionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionStrategy::Coordinate => "coordinate",
            ExtractionStrategy::Label => "label",
        }
    }

    pub fn extract(&self, grid: &SheetGrid) -> PartialRecord {
        log::debug!("Running {} extraction", self.name());
        match self {
            ExtractionStrategy::Coordinate => coordinate::extract(grid),
            ExtractionStrategy::Label => label::extract(grid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_prefers_self() {
        let primary = PartialRecord {
            model: Some("CraneX".into()),
            owner: Some("Työmaa Oy".into()),
            ..Default::default()
        };
        let secondary = PartialRecord {
            model: Some("Other".into()),
            manufacturer: Some("Konecranes".into()),
            inspection_result: Some(InspectionResult::NeedsRepair),
            ..Default::default()
        };

        let merged = primary.or(secondary);
        assert_eq!(merged.model.as_deref(), Some("CraneX"));
        assert_eq!(merged.owner.as_deref(), Some("Työmaa Oy"));
        assert_eq!(merged.manufacturer.as_deref(), Some("Konecranes"));
        assert_eq!(merged.inspection_result, Some(InspectionResult::NeedsRepair));
    }

    #[test]
    fn test_sufficiency() {
        assert!(!PartialRecord::default().is_sufficient());
        let owner_only = PartialRecord {
            owner: Some("Asiakas".into()),
            ..Default::default()
        };
        assert!(!owner_only.is_sufficient());
        let serial = PartialRecord {
            serial_number: Some("SN001".into()),
            ..Default::default()
        };
        assert!(serial.is_sufficient());
    }

    #[test]
    fn test_into_record_defaults() {
        let record = PartialRecord::default().into_record("empty.xlsx");
        assert_eq!(record.inspection_type, DEFAULT_INSPECTION_TYPE);
        assert_eq!(record.inspection_result, InspectionResult::Unknown);
        assert_eq!(record.filename, "empty.xlsx");
        assert!(record.error.is_none());
    }
}
