//! Configuration loading and management for the payslip engine.
//!
//! This module loads the per-year reference tables (income tax brackets,
//! Medicare levy thresholds, surcharge tiers and superannuation rate) from
//! YAML, and the server settings from the environment.
//!
//! # Example
//!
//! ```
//! use payslip_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::builtin().unwrap();
//! println!("Superannuation: {}", config.super_rate("2025-26").unwrap());
//! ```

mod loader;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use settings::ServerSettings;
pub use types::{
    IncomeBand, MedicareLevyConfig, SurchargeBracket, TaxBracket, TaxTables, TaxYearConfig,
};
