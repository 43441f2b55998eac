//! Reading inspection report spreadsheets

pub mod coordinate;
pub mod dates;
pub mod extractor;
pub mod label;
pub mod record;
pub mod strategy;

pub use extractor::extract_inspection_file;
pub use record::InspectionRecord;
