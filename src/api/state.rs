//! Application state for the payslip API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::TaxTables;
use crate::usage::{InMemoryUsageStore, UsageStore};

/// Shared application state.
///
/// Holds the immutable tax tables and the usage counter store.
#[derive(Clone)]
pub struct AppState {
    tables: Arc<TaxTables>,
    usage: Arc<dyn UsageStore>,
}

impl AppState {
    /// Creates state with an in-memory usage store.
    pub fn new(tables: TaxTables) -> Self {
        Self::with_usage_store(tables, Arc::new(InMemoryUsageStore::new()))
    }

    /// Creates state with the given usage store.
    pub fn with_usage_store(tables: TaxTables, usage: Arc<dyn UsageStore>) -> Self {
        Self {
            tables: Arc::new(tables),
            usage,
        }
    }

    /// Returns the loaded tax tables.
    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }

    /// Returns the usage store.
    pub fn usage(&self) -> &dyn UsageStore {
        self.usage.as_ref()
    }
}
