//! User configuration (`~/.config/tarkastus/config.toml`)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_REGISTRY_SHEET: &str = "Kaikki";
const DEFAULT_OUTPUT_NAME: &str = "Asiakasrekisteri_updated.xlsx";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sheet in the registry workbook that holds the equipment rows
    pub registry_sheet: String,
    /// Where the updated registry is written
    pub output_path: PathBuf,
    /// Extensions accepted for inspection files, without the dot
    pub accepted_extensions: Vec<String>,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_sheet: DEFAULT_REGISTRY_SHEET.to_string(),
            output_path: std::env::temp_dir().join(DEFAULT_OUTPUT_NAME),
            accepted_extensions: vec!["xlsx".to_string(), "xls".to_string()],
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// `<config dir>/tarkastus/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tarkastus").join("config.toml"))
    }

    /// Load from an explicit path, or the default location when present
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Existing file with one of the accepted spreadsheet extensions
    pub fn is_accepted(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.accepted_extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
    }
}
