//! Core data models for the payslip engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod pay_frequency;
mod payroll_input;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, PayFigures, PayrollMetadata, PayrollResult,
};
pub use pay_frequency::PayFrequency;
pub use payroll_input::{
    DATE_FORMAT, DEFAULT_FTE, DEFAULT_FULL_TIME_HOURS, InputField, PayrollInput, RawPayrollInput,
};
