//! Request types for the payslip API.
//!
//! This module defines the JSON request structure for the `/calculate` endpoint.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DEFAULT_FTE, DEFAULT_FULL_TIME_HOURS, PayFrequency, PayrollInput};

/// Request body for the `/calculate` endpoint.
///
/// Unlike the form-style input, every required field must be present and
/// well typed; serde rejects the body otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// How often the employee is paid.
    pub pay_frequency: PayFrequency,
    /// The date the pay is made.
    pub pay_date: NaiveDate,
    /// The last day of the pay period.
    pub period_end_date: NaiveDate,
    /// The date employment started.
    pub employment_start_date: NaiveDate,
    /// Full-time annual salary before FTE adjustment.
    pub annual_salary: Decimal,
    /// Tax year key, e.g. `"2025-26"`.
    pub tax_year: String,
    /// Full-time hours per week. Defaults to 38.
    #[serde(default)]
    pub full_time_hours: Option<Decimal>,
    /// Full-time equivalent. Defaults to 1.
    #[serde(default)]
    pub fte: Option<Decimal>,
    /// Whether the employee holds private hospital cover.
    #[serde(default)]
    pub has_private_health_insurance: bool,
}

impl From<PayrollRequest> for PayrollInput {
    fn from(req: PayrollRequest) -> Self {
        PayrollInput {
            pay_frequency: req.pay_frequency,
            pay_date: req.pay_date,
            period_end_date: req.period_end_date,
            employment_start_date: req.employment_start_date,
            annual_salary: req.annual_salary,
            tax_year: req.tax_year,
            full_time_hours: req.full_time_hours.unwrap_or(DEFAULT_FULL_TIME_HOURS),
            fte: req.fte.unwrap_or(DEFAULT_FTE),
            has_private_health_insurance: req.has_private_health_insurance,
        }
    }
}
