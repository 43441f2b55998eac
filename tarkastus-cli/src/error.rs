//! Run-level failures
//!
//! Problems with a single inspection file never show up here; they are
//! reported per file. These errors abort the whole run.

use std::path::PathBuf;

#[derive(Debug)]
pub enum PipelineError {
    /// Registry path missing or not a file
    RegistryNotFound { path: PathBuf },
    /// Registry workbook lacks the required sheet
    MissingSheet { sheet: String },
    /// Registry workbook could not be read
    RegistryLoad { message: String },
    /// Nothing left to save after reconciliation
    EmptyData,
    /// Both the structure-preserving and the plain writer failed
    Write { primary: String, fallback: String },
    /// Every inspection file was rejected before extraction
    NoInspectionFiles,
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::RegistryNotFound { path } => {
                write!(f, "Customer registry file not found: {}", path.display())
            }
            PipelineError::MissingSheet { sheet } => {
                write!(f, "Required sheet '{}' not found in registry file", sheet)
            }
            PipelineError::RegistryLoad { message } => {
                write!(f, "Failed to update registry: {}", message)
            }
            PipelineError::EmptyData => write!(
                f,
                "No data to save in registry. Table is empty after processing."
            ),
            PipelineError::Write { primary, fallback } => write!(
                f,
                "Failed to save registry (preserving save: {}; plain save: {})",
                primary, fallback
            ),
            PipelineError::NoInspectionFiles => {
                write!(f, "No valid inspection files to process")
            }
        }
    }
}

impl std::error::Error for PipelineError {}
