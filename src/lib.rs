//! Payslip engine for Australian payroll.
//!
//! This crate turns a salary, pay frequency and a few dates into a complete
//! per-period payslip: PAYG income tax, Medicare levy and surcharge,
//! superannuation, hours, annual leave accrual and year-to-date totals, all
//! driven by per-year tax tables.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod session;
pub mod usage;
