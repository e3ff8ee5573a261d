//! Calculation result models for the payslip engine.
//!
//! This module contains the [`PayrollResult`] type and its associated
//! structures: the per-year and year-to-date figures, the period metadata,
//! and the audit trace recording every rule that was applied.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayFrequency;

/// The six pay components that are tracked both annually and year-to-date.
///
/// # Example
///
/// ```
/// use payslip_engine::models::PayFigures;
/// use rust_decimal::Decimal;
///
/// let figures = PayFigures::default();
/// assert_eq!(figures.gross_pay, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayFigures {
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Income tax withheld.
    pub income_tax: Decimal,
    /// Medicare levy.
    pub medicare_levy: Decimal,
    /// Medicare levy surcharge.
    pub medicare_levy_surcharge: Decimal,
    /// Net pay after tax and Medicare charges.
    pub net_income: Decimal,
    /// Employer superannuation contribution.
    pub superannuation: Decimal,
}

impl PayFigures {
    /// Applies `f` to each pair of matching fields.
    pub fn zip_with<F>(&self, other: &PayFigures, f: F) -> PayFigures
    where
        F: Fn(Decimal, Decimal) -> Decimal,
    {
        PayFigures {
            gross_pay: f(self.gross_pay, other.gross_pay),
            income_tax: f(self.income_tax, other.income_tax),
            medicare_levy: f(self.medicare_levy, other.medicare_levy),
            medicare_levy_surcharge: f(
                self.medicare_levy_surcharge,
                other.medicare_levy_surcharge,
            ),
            net_income: f(self.net_income, other.net_income),
            superannuation: f(self.superannuation, other.superannuation),
        }
    }

    /// Applies `f` to every field.
    pub fn map<F>(&self, f: F) -> PayFigures
    where
        F: Fn(Decimal) -> Decimal,
    {
        self.zip_with(self, |value, _| f(value))
    }

    /// Field names paired with their values, in declaration order.
    pub fn fields(&self) -> [(&'static str, Decimal); 6] {
        [
            ("gross_pay", self.gross_pay),
            ("income_tax", self.income_tax),
            ("medicare_levy", self.medicare_levy),
            ("medicare_levy_surcharge", self.medicare_levy_surcharge),
            ("net_income", self.net_income),
            ("superannuation", self.superannuation),
        ]
    }
}

/// Facts about the pay period and year-to-date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollMetadata {
    /// The tax year whose tables were applied.
    pub tax_year: String,
    /// The pay frequency.
    pub pay_frequency: PayFrequency,
    /// Pay periods per year for the frequency.
    pub periods_per_year: Decimal,
    /// Length of one period in days.
    pub period_days: Decimal,
    /// Pay periods counted from the year-to-date start up to the pay date.
    pub periods_elapsed: u32,
    /// Annual salary multiplied by FTE.
    pub effective_annual_salary: Decimal,
    /// The last day of the pay period, as supplied.
    pub period_end_date: NaiveDate,
    /// 1 July of the financial year containing the pay date.
    pub financial_year_start: NaiveDate,
    /// The later of the financial year start and employment start.
    pub ytd_start: NaiveDate,
    /// Days from `ytd_start` to the pay date (never negative).
    pub elapsed_days: i64,
    /// `elapsed_days / 365.25`.
    pub ytd_proportion: Decimal,
    /// Zero-based index of the matched income tax bracket.
    pub tax_bracket_index: usize,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag outcomes that are valid but worth a second look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a payslip calculation.
///
/// All monetary and hour values are raw, unrounded decimals; formatting
/// is left to the caller (see [`crate::format`]). The struct holds no
/// timestamps or ids, so equal inputs always produce equal results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// Annual taxable income (the FTE-adjusted salary).
    pub taxable_income: Decimal,
    /// Income tax for the period.
    pub income_tax: Decimal,
    /// Medicare levy for the period.
    pub medicare_levy: Decimal,
    /// Medicare levy surcharge for the period.
    pub medicare_levy_surcharge: Decimal,
    /// Levy plus surcharge for the period.
    pub total_medicare_charges: Decimal,
    /// Gross minus income tax and Medicare charges.
    pub net_income: Decimal,
    /// Employer superannuation for the period (not deducted from net).
    pub superannuation: Decimal,
    /// Annual leave accrued this period, in hours.
    pub annual_leave_hours: Decimal,
    /// Hours worked this period.
    pub hours_worked: Decimal,
    /// Effective hourly rate.
    pub hourly_rate: Decimal,
    /// The annual figures the per-period values derive from.
    pub annual: PayFigures,
    /// Year-to-date totals, capped at the prorated annual figures.
    pub ytd: PayFigures,
    /// Period and year-to-date metadata.
    pub metadata: PayrollMetadata,
    /// Every rule applied, in order.
    pub audit_trace: AuditTrace,
}
