//! Calculation logic for the payslip engine.
//!
//! Each rule lives in its own module and returns its figure together with
//! an audit step: resident income tax, the Medicare levy and its phase-in,
//! the Medicare levy surcharge, superannuation guarantee, hours worked and
//! hourly rate, annual leave accrual, and capped year-to-date totals.
//! [`calculate_payslip`] runs them in order.

mod annual_leave;
mod income_tax;
mod medicare_levy;
mod medicare_surcharge;
mod payslip;
mod superannuation;
mod working_hours;
mod year_to_date;

pub use annual_leave::{
    ANNUAL_LEAVE_DAYS, AnnualLeaveResult, WORKING_DAYS_PER_YEAR, calculate_annual_leave,
};
pub use income_tax::{IncomeTaxResult, calculate_income_tax};
pub use medicare_levy::{LevyBand, MedicareLevyResult, calculate_medicare_levy};
pub use medicare_surcharge::{MedicareSurchargeResult, calculate_medicare_levy_surcharge};
pub use payslip::{calculate_payslip, compute};
pub use superannuation::{SuperannuationResult, calculate_superannuation};
pub use working_hours::{WEEKS_PER_YEAR, WorkingHoursResult, calculate_working_hours};
pub use year_to_date::{
    DAYS_PER_YEAR, YearToDateResult, calculate_year_to_date, financial_year_start,
};
