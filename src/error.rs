//! Error types for the payslip engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition the typed entry points can report. The silent
//! form-style path ([`crate::calculation::compute`]) never surfaces these.

use thiserror::Error;

/// The main error type for the payslip engine.
///
/// # Example
///
/// ```
/// use payslip_engine::error::EngineError;
///
/// let error = EngineError::TaxYearNotFound {
///     tax_year: "2019-20".to_string(),
/// };
/// assert_eq!(error.to_string(), "Tax year not found: 2019-20");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A tax year table was loaded but violates a structural rule.
    #[error("Invalid tax table for '{tax_year}': {message}")]
    InvalidTaxTable {
        /// The tax year whose table is invalid.
        tax_year: String,
        /// What rule the table breaks.
        message: String,
    },

    /// No reference table exists for the requested tax year.
    #[error("Tax year not found: {tax_year}")]
    TaxYearNotFound {
        /// The tax year that was requested.
        tax_year: String,
    },

    /// An input field held a value outside its domain.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The usage counter store failed to read or persist.
    #[error("Usage store error: {message}")]
    UsageStore {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
