//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax-year
//! reference tables from YAML files, either embedded in the binary or read
//! from a directory on disk.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{TaxTables, TaxYearConfig};

/// The tables shipped with the crate, as `(file name, contents)` pairs.
const BUILTIN_TAX_YEARS: &[(&str, &str)] = &[
    (
        "2024-25.yaml",
        include_str!("../../config/tax_years/2024-25.yaml"),
    ),
    (
        "2025-26.yaml",
        include_str!("../../config/tax_years/2025-26.yaml"),
    ),
];

/// Loads and provides access to tax-year reference tables.
///
/// # Directory Structure
///
/// A configuration directory holds one file per financial year:
/// ```text
/// config/tax_years/
/// ├── 2024-25.yaml
/// └── 2025-26.yaml
/// ```
///
/// Adding a year means dropping another file in the directory.
///
/// # Example
///
/// ```
/// use payslip_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let year = loader.tax_year("2025-26").unwrap();
/// assert_eq!(year.income_tax.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    tables: TaxTables,
}

impl ConfigLoader {
    /// Loads the tables embedded in the crate.
    pub fn builtin() -> EngineResult<Self> {
        let years = BUILTIN_TAX_YEARS
            .iter()
            .map(|(name, content)| Self::parse_yaml(name, content))
            .collect::<EngineResult<Vec<_>>>()?;

        Self::from_years(years)
    }

    /// Loads every `*.yaml` table from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The directory is missing or contains no YAML files
    /// - Any file contains invalid YAML or misses a required field
    /// - Any table breaks the bracket rules checked by [`TaxYearConfig::validate`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payslip_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/tax_years")?;
    /// # Ok::<(), payslip_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let dir_str = dir.display().to_string();

        if !dir.is_dir() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut years = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                years.push(Self::load_yaml(&path)?);
            }
        }

        if years.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax year files found)", dir_str),
            });
        }

        Self::from_years(years)
    }

    fn from_years(years: Vec<TaxYearConfig>) -> EngineResult<Self> {
        let tables = TaxTables::new(years)?;
        debug!(
            years = ?tables.years().map(|y| y.tax_year.as_str()).collect::<Vec<_>>(),
            "Loaded tax tables"
        );
        Ok(Self { tables })
    }

    /// Reads and parses one YAML table.
    fn load_yaml(path: &Path) -> EngineResult<TaxYearConfig> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&path_str, &content)
    }

    fn parse_yaml(path: &str, content: &str) -> EngineResult<TaxYearConfig> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns every loaded table.
    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }

    /// Consumes the loader, yielding the tables.
    pub fn into_tables(self) -> TaxTables {
        self.tables
    }

    /// Gets the table for a tax year.
    pub fn tax_year(&self, tax_year: &str) -> EngineResult<&TaxYearConfig> {
        self.tables.get(tax_year)
    }

    /// Gets the superannuation guarantee rate for a tax year.
    ///
    /// ```
    /// use payslip_engine::config::ConfigLoader;
    /// use rust_decimal::Decimal;
    ///
    /// let loader = ConfigLoader::builtin()?;
    /// assert_eq!(loader.super_rate("2025-26")?, Decimal::new(12, 2));
    /// # Ok::<(), payslip_engine::error::EngineError>(())
    /// ```
    pub fn super_rate(&self, tax_year: &str) -> EngineResult<Decimal> {
        Ok(self.tax_year(tax_year)?.superannuation_rate)
    }
}
