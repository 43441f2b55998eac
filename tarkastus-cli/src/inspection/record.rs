//! Parsed inspection report

use chrono::NaiveDate;
use serde::Serialize;

/// Outcome recorded on the inspection form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum InspectionResult {
    #[serde(rename = "Käyttökunnossa")]
    Serviceable,
    #[serde(rename = "Korjattava")]
    NeedsRepair,
    #[serde(rename = "Ei käyttökunnossa")]
    NotServiceable,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl InspectionResult {
    /// Label as written on the form
    pub fn label(&self) -> &'static str {
        match self {
            InspectionResult::Serviceable => "Käyttökunnossa",
            InspectionResult::NeedsRepair => "Korjattava",
            InspectionResult::NotServiceable => "Ei käyttökunnossa",
            InspectionResult::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for InspectionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One parsed inspection file
///
/// When `error` is set the domain fields carry no information.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InspectionRecord {
    pub inspection_type: String,
    pub inspection_date: Option<NaiveDate>,
    pub next_inspection_date: Option<NaiveDate>,
    /// Periodic re-certification date
    pub kympitys_date: Option<NaiveDate>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub owner: Option<String>,
    pub owner_address: Option<String>,
    pub inspection_result: InspectionResult,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InspectionRecord {
    /// Record for a file whose extraction failed entirely
    pub fn failed(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// At least one identifying field was found
    pub fn has_meaningful_data(&self) -> bool {
        !self.has_error()
            && (is_present(&self.model)
                || is_present(&self.serial_number)
                || self.inspection_date.is_some())
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}
