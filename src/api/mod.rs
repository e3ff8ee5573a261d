//! HTTP API module for the payslip engine.
//!
//! This module provides the REST endpoints for calculating payslips,
//! listing the loaded tax years and reading usage counters.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::PayrollRequest;
pub use response::{ApiError, CalculationResponse, TaxYearSummary, UsageResponse};
pub use state::AppState;
