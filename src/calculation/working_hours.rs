//! Hours worked and effective hourly rate.
//!
//! Both derive from the full-time week, the FTE and the period length; no
//! timesheet is involved.

use rust_decimal::Decimal;

use crate::models::{AuditStep, PayFrequency};

/// Weeks in a year used for the hourly rate, matching the weekly period count.
pub const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(5218, 0, 0, false, 2);

/// The result of calculating period hours and hourly rate.
#[derive(Debug, Clone)]
pub struct WorkingHoursResult {
    /// Hours worked in the period.
    pub hours_worked: Decimal,
    /// Effective hourly rate.
    pub hourly_rate: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates hours worked in a period and the effective hourly rate.
///
/// - hours worked = `full_time_hours * fte * period_days / 7`
/// - hourly rate = `effective_annual_salary / (52.18 * full_time_hours * fte)`,
///   or zero when the employee works no hours (FTE of zero)
///
/// # Arguments
///
/// * `full_time_hours` - Hours in a full-time week
/// * `fte` - Fraction of a full-time role
/// * `pay_frequency` - Determines the days in the period
/// * `effective_annual_salary` - The FTE-adjusted annual salary
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a `WorkingHoursResult` containing the period hours, the hourly
/// rate and an audit step.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_working_hours;
/// use payslip_engine::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// let result = calculate_working_hours(
///     Decimal::from(38),
///     Decimal::ONE,
///     PayFrequency::Fortnightly,
///     Decimal::from(90000),
///     1,
/// );
/// assert_eq!(result.hours_worked, Decimal::from(76));
/// ```
pub fn calculate_working_hours(
    full_time_hours: Decimal,
    fte: Decimal,
    pay_frequency: PayFrequency,
    effective_annual_salary: Decimal,
    step_number: u32,
) -> WorkingHoursResult {
    let weekly_hours = full_time_hours * fte;
    let hours_worked = weekly_hours * pay_frequency.period_days() / Decimal::from(7);

    let annual_hours = WEEKS_PER_YEAR * weekly_hours;
    let hourly_rate = if annual_hours.is_zero() {
        Decimal::ZERO
    } else {
        effective_annual_salary / annual_hours
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "working_hours".to_string(),
        rule_name: "Hours Worked and Hourly Rate".to_string(),
        input: serde_json::json!({
            "full_time_hours": full_time_hours.normalize().to_string(),
            "fte": fte.normalize().to_string(),
            "pay_frequency": pay_frequency,
            "period_days": pay_frequency.period_days().normalize().to_string(),
            "effective_annual_salary": effective_annual_salary.normalize().to_string()
        }),
        output: serde_json::json!({
            "hours_worked": hours_worked.normalize().to_string(),
            "annual_hours": annual_hours.normalize().to_string(),
            "hourly_rate": hourly_rate.normalize().to_string()
        }),
        reasoning: format!(
            "{} h/week x {} FTE x {} days / 7 = {} h; ${} / {} h = ${}/h",
            full_time_hours.normalize(),
            fte.normalize(),
            pay_frequency.period_days().normalize(),
            hours_worked.normalize(),
            effective_annual_salary.normalize(),
            annual_hours.normalize(),
            hourly_rate.normalize()
        ),
    };

    WorkingHoursResult {
        hours_worked,
        hourly_rate,
        audit_step,
    }
}
