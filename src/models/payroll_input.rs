//! Payroll input models.
//!
//! [`PayrollInput`] is the complete, typed record the engine calculates
//! from. [`RawPayrollInput`] is the form-style record a caller edits one
//! field at a time; it only becomes a `PayrollInput` once every required
//! field is present.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::PayFrequency;

/// Date format accepted by the raw input (ISO 8601 calendar date).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Standard full-time hours per week.
pub const DEFAULT_FULL_TIME_HOURS: Decimal = Decimal::from_parts(38, 0, 0, false, 0);

/// Full-time equivalent used when none is supplied.
pub const DEFAULT_FTE: Decimal = Decimal::ONE;

/// Largest annual salary the engine accepts.
pub const MAX_ANNUAL_SALARY: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest full-time week, in hours (24 x 7).
pub const MAX_FULL_TIME_HOURS: Decimal = Decimal::from_parts(168, 0, 0, false, 0);

/// A complete payroll input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// How often the employee is paid.
    pub pay_frequency: PayFrequency,
    /// The date this payslip is paid.
    pub pay_date: NaiveDate,
    /// The last day of the pay period.
    pub period_end_date: NaiveDate,
    /// The date employment began.
    pub employment_start_date: NaiveDate,
    /// Full-time-equivalent gross annual salary.
    pub annual_salary: Decimal,
    /// Key into the tax tables (e.g. "2025-26").
    pub tax_year: String,
    /// Hours in a full-time week.
    pub full_time_hours: Decimal,
    /// Fraction of a full-time role, in `[0, 1]`.
    pub fte: Decimal,
    /// Whether the employee holds private hospital cover.
    pub has_private_health_insurance: bool,
}

impl PayrollInput {
    /// Checks the numeric fields are inside their domains.
    ///
    /// [`calculate_payslip`](crate::calculation::calculate_payslip) calls
    /// this before any arithmetic, so out-of-range values surface as
    /// [`EngineError::InvalidInput`] rather than a nonsensical payslip.
    pub fn validate(&self) -> EngineResult<()> {
        if self.annual_salary < Decimal::ZERO {
            return Err(invalid("annual_salary", "must not be negative"));
        }
        if self.annual_salary > MAX_ANNUAL_SALARY {
            return Err(invalid("annual_salary", "must not exceed 1000000000"));
        }
        if self.fte < Decimal::ZERO || self.fte > Decimal::ONE {
            return Err(invalid("fte", "must be between 0 and 1"));
        }
        if self.full_time_hours <= Decimal::ZERO {
            return Err(invalid("full_time_hours", "must be positive"));
        }
        if self.full_time_hours > MAX_FULL_TIME_HOURS {
            return Err(invalid("full_time_hours", "must not exceed 168"));
        }
        Ok(())
    }

    /// The FTE-adjusted annual salary.
    pub fn effective_annual_salary(&self) -> Decimal {
        self.annual_salary * self.fte
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Identifies one field of a [`RawPayrollInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    /// [`RawPayrollInput::pay_frequency`]
    PayFrequency,
    /// [`RawPayrollInput::pay_date`]
    PayDate,
    /// [`RawPayrollInput::period_end_date`]
    PeriodEndDate,
    /// [`RawPayrollInput::employment_start_date`]
    EmploymentStartDate,
    /// [`RawPayrollInput::annual_salary`]
    AnnualSalary,
    /// [`RawPayrollInput::tax_year`]
    TaxYear,
    /// [`RawPayrollInput::full_time_hours`]
    FullTimeHours,
    /// [`RawPayrollInput::fte`]
    Fte,
    /// [`RawPayrollInput::has_private_health_insurance`]
    HasPrivateHealthInsurance,
}

/// Form-style payroll input, as typed by a user.
///
/// Every field except the insurance flag is kept as text so that partially
/// entered or malformed values never raise; [`RawPayrollInput::parse`]
/// decides whether the record is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPayrollInput {
    /// Pay frequency name.
    pub pay_frequency: String,
    /// Pay date, `YYYY-MM-DD`.
    pub pay_date: String,
    /// Period end date, `YYYY-MM-DD`.
    pub period_end_date: String,
    /// Employment start date, `YYYY-MM-DD`.
    pub employment_start_date: String,
    /// Annual salary.
    pub annual_salary: String,
    /// Tax year key.
    pub tax_year: String,
    /// Full-time hours per week.
    pub full_time_hours: String,
    /// Full-time equivalent.
    pub fte: String,
    /// Private hospital cover.
    pub has_private_health_insurance: bool,
}

impl Default for RawPayrollInput {
    fn default() -> Self {
        Self {
            pay_frequency: String::new(),
            pay_date: String::new(),
            period_end_date: String::new(),
            employment_start_date: String::new(),
            annual_salary: String::new(),
            tax_year: String::new(),
            full_time_hours: DEFAULT_FULL_TIME_HOURS.to_string(),
            fte: DEFAULT_FTE.to_string(),
            has_private_health_insurance: false,
        }
    }
}

impl RawPayrollInput {
    /// Replaces one field.
    ///
    /// The insurance flag accepts `true`, `1`, `yes` and `on` (any case) as
    /// true; anything else is false.
    pub fn set(&mut self, field: InputField, value: &str) {
        let value = value.to_string();
        match field {
            InputField::PayFrequency => self.pay_frequency = value,
            InputField::PayDate => self.pay_date = value,
            InputField::PeriodEndDate => self.period_end_date = value,
            InputField::EmploymentStartDate => self.employment_start_date = value,
            InputField::AnnualSalary => self.annual_salary = value,
            InputField::TaxYear => self.tax_year = value,
            InputField::FullTimeHours => self.full_time_hours = value,
            InputField::Fte => self.fte = value,
            InputField::HasPrivateHealthInsurance => {
                self.has_private_health_insurance = matches!(
                    value.trim().to_lowercase().as_str(),
                    "true" | "1" | "yes" | "on"
                )
            }
        }
    }

    /// Converts to a complete input, or `None` if a required field is missing.
    ///
    /// Required fields are the frequency, the three dates, the salary and
    /// the tax year. Present-but-unparseable values follow these rules:
    /// - frequency or dates that do not parse count as missing
    /// - a salary that does not parse is treated as zero
    /// - a salary outside `[-1e9, 1e9]` counts as missing
    /// - full-time hours fall back to 38 when blank, unparseable or outside `(0, 168]`
    /// - FTE falls back to 1.0 when blank or unparseable, and is clamped to `[0, 1]`
    ///
    /// ```
    /// use payslip_engine::models::{InputField, RawPayrollInput};
    ///
    /// let mut raw = RawPayrollInput::default();
    /// assert!(raw.parse().is_none());
    ///
    /// raw.set(InputField::PayFrequency, "fortnightly");
    /// raw.set(InputField::PayDate, "2025-10-15");
    /// raw.set(InputField::PeriodEndDate, "2025-10-12");
    /// raw.set(InputField::EmploymentStartDate, "2020-01-01");
    /// raw.set(InputField::AnnualSalary, "90000");
    /// raw.set(InputField::TaxYear, "2025-26");
    /// assert!(raw.parse().is_some());
    /// ```
    pub fn parse(&self) -> Option<PayrollInput> {
        let pay_frequency = PayFrequency::from_str(required(&self.pay_frequency)?).ok()?;
        let pay_date = parse_date(&self.pay_date)?;
        let period_end_date = parse_date(&self.period_end_date)?;
        let employment_start_date = parse_date(&self.employment_start_date)?;
        let annual_salary = parse_decimal(required(&self.annual_salary)?).unwrap_or_default();
        if annual_salary.abs() > MAX_ANNUAL_SALARY {
            return None;
        }
        let tax_year = required(&self.tax_year)?.to_string();

        let full_time_hours = parse_decimal(&self.full_time_hours)
            .filter(|hours| *hours > Decimal::ZERO && *hours <= MAX_FULL_TIME_HOURS)
            .unwrap_or(DEFAULT_FULL_TIME_HOURS);
        let fte = parse_decimal(&self.fte)
            .unwrap_or(DEFAULT_FTE)
            .clamp(Decimal::ZERO, Decimal::ONE);

        Some(PayrollInput {
            pay_frequency,
            pay_date,
            period_end_date,
            employment_start_date,
            annual_salary,
            tax_year,
            full_time_hours,
            fte,
            has_private_health_insurance: self.has_private_health_insurance,
        })
    }
}

fn required(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(required(value)?, DATE_FORMAT).ok()
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' '))
        .collect();
    Decimal::from_str(&cleaned).ok()
}
