//! Year-to-date totals.
//!
//! Year-to-date figures count whole pay periods since the later of the
//! financial year start (1 July) and the employment start, then cap each
//! figure at the annual amount pro-rated over the elapsed days. The cap
//! stops the period count from overshooting near year boundaries.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::models::{AuditStep, PayFigures, PayFrequency};

/// Average days per year used to pro-rate annual figures.
pub const DAYS_PER_YEAR: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);

/// Month the Australian financial year starts in.
const FINANCIAL_YEAR_START_MONTH: u32 = 7;

/// The result of calculating year-to-date totals.
#[derive(Debug, Clone)]
pub struct YearToDateResult {
    /// Capped year-to-date totals.
    pub ytd: PayFigures,
    /// 1 July of the financial year containing the pay date.
    pub financial_year_start: NaiveDate,
    /// The later of the financial year start and employment start.
    pub ytd_start: NaiveDate,
    /// Days from `ytd_start` to the pay date, never negative.
    pub elapsed_days: i64,
    /// `elapsed_days / 365.25`.
    pub proportion: Decimal,
    /// Pay periods counted up to and including this one.
    pub periods_to_date: u32,
    /// Names of fields whose period-count total exceeded the pro-rated cap.
    pub capped_fields: Vec<&'static str>,
    /// True if employment starts after the pay date.
    pub starts_after_pay_date: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns 1 July of the financial year that contains `date`.
///
/// ```
/// use payslip_engine::calculation::financial_year_start;
/// use chrono::NaiveDate;
///
/// let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// assert_eq!(financial_year_start(date(2025, 10, 15)), date(2025, 7, 1));
/// assert_eq!(financial_year_start(date(2026, 3, 1)), date(2025, 7, 1));
/// assert_eq!(financial_year_start(date(2025, 7, 1)), date(2025, 7, 1));
/// ```
pub fn financial_year_start(date: NaiveDate) -> NaiveDate {
    let year = if date.month() >= FINANCIAL_YEAR_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    };
    NaiveDate::from_ymd_opt(year, FINANCIAL_YEAR_START_MONTH, 1).unwrap_or(date)
}

/// Calculates capped year-to-date totals.
///
/// For each field, `min(per_period * periods_to_date, annual * elapsed_days / 365.25)`
/// where `periods_to_date = floor(elapsed_days / period_days) + 1`.
///
/// An employment start after the pay date is treated as zero elapsed days.
///
/// # Arguments
///
/// * `pay_date` - The date this payslip is paid
/// * `employment_start_date` - The date employment began
/// * `pay_frequency` - Determines the period length
/// * `per_period` - Figures for a single pay period
/// * `annual` - Figures for the whole year
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a `YearToDateResult` containing the capped totals, the elapsed
/// days and proportion used, and an audit step.
pub fn calculate_year_to_date(
    pay_date: NaiveDate,
    employment_start_date: NaiveDate,
    pay_frequency: PayFrequency,
    per_period: &PayFigures,
    annual: &PayFigures,
    step_number: u32,
) -> YearToDateResult {
    let fy_start = financial_year_start(pay_date);
    let ytd_start = fy_start.max(employment_start_date);
    let raw_elapsed = (pay_date - ytd_start).num_days();
    let starts_after_pay_date = raw_elapsed < 0;
    let elapsed_days = raw_elapsed.max(0);

    let elapsed = Decimal::from(elapsed_days);
    let proportion = elapsed / DAYS_PER_YEAR;
    let periods = (elapsed / pay_frequency.period_days()).floor() + Decimal::ONE;
    let periods_to_date = periods.to_u32().unwrap_or(u32::MAX);

    let naive = per_period.map(|value| value * periods);
    let ceiling = annual.map(|value| value * proportion);
    let ytd = naive.zip_with(&ceiling, Decimal::min);

    let capped_fields: Vec<&'static str> = naive
        .fields()
        .iter()
        .zip(ceiling.fields().iter())
        .filter(|((_, n), (_, c))| n > c)
        .map(|((name, _), _)| *name)
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "year_to_date".to_string(),
        rule_name: "Year-to-Date Totals".to_string(),
        input: serde_json::json!({
            "pay_date": pay_date.to_string(),
            "employment_start_date": employment_start_date.to_string(),
            "pay_frequency": pay_frequency
        }),
        output: serde_json::json!({
            "financial_year_start": fy_start.to_string(),
            "ytd_start": ytd_start.to_string(),
            "elapsed_days": elapsed_days,
            "proportion": proportion.round_dp(6).normalize().to_string(),
            "periods_to_date": periods_to_date,
            "capped_fields": capped_fields,
            "ytd_gross_pay": ytd.gross_pay.normalize().to_string()
        }),
        reasoning: format!(
            "{} days since {} ({} periods, {} of a year); {} of 6 fields capped at the pro-rated annual amount",
            elapsed_days,
            ytd_start,
            periods_to_date,
            proportion.round_dp(4).normalize(),
            capped_fields.len()
        ),
    };

    YearToDateResult {
        ytd,
        financial_year_start: fy_start,
        ytd_start,
        elapsed_days,
        proportion,
        periods_to_date,
        capped_fields,
        starts_after_pay_date,
        audit_step,
    }
}
