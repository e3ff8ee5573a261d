//! Server settings read from the environment.
//!
//! Variables are prefixed with `PAYSLIP_`:
//!
//! | Variable              | Default          |
//! |-----------------------|------------------|
//! | `PAYSLIP_BIND_ADDR`   | `127.0.0.1:3000` |
//! | `PAYSLIP_CONFIG_DIR`  | embedded tables  |
//! | `PAYSLIP_USAGE_FILE`  | in-memory counts |
//! | `PAYSLIP_LOG_LEVEL`   | `info`           |
//!
//! A `.env` file in the working directory is read first; variables already
//! set in the process environment win over it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Settings for the `payslip-server` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: String,
    /// Directory of tax-year YAML files; `None` uses the embedded tables.
    pub config_dir: Option<PathBuf>,
    /// JSON file backing the usage counter; `None` keeps counts in memory.
    pub usage_file: Option<PathBuf>,
    /// Log level filter (e.g. "info", "debug").
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            config_dir: None,
            usage_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl ServerSettings {
    /// Loads settings from process environment variables, after loading any
    /// `.env` file found in the working directory.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings from a dotenv-style file without touching the process
    /// environment. Process variables still take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns a [`dotenvy::Error`] if the file cannot be read or a line
    /// does not parse.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> dotenvy::Result<Self> {
        let file: HashMap<String, String> =
            dotenvy::from_path_iter(path.as_ref())?.collect::<dotenvy::Result<_>>()?;

        Ok(Self::from_lookup(|key| {
            std::env::var(key).ok().or_else(|| file.get(key).cloned())
        }))
    }

    /// Loads settings through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(addr) = get("PAYSLIP_BIND_ADDR") {
            settings.bind_addr = addr;
        }
        settings.config_dir = get("PAYSLIP_CONFIG_DIR").map(PathBuf::from);
        settings.usage_file = get("PAYSLIP_USAGE_FILE").map(PathBuf::from);
        if let Some(level) = get("PAYSLIP_LOG_LEVEL") {
            settings.log_level = level;
        }

        settings
    }
}
