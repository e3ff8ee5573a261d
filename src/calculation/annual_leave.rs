//! Annual leave accrual.
//!
//! Leave accrues on every working day at a rate that yields the yearly
//! entitlement over a year of working days, pro-rated by FTE.

use rust_decimal::Decimal;

use crate::models::{AuditStep, PayFrequency};

/// Days of annual leave per year for a full-time employee.
pub const ANNUAL_LEAVE_DAYS: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Working days in an average year (52.18 weeks x 5 days, rounded).
pub const WORKING_DAYS_PER_YEAR: Decimal = Decimal::from_parts(26087, 0, 0, false, 2);

/// Working days in a full-time week.
const DAYS_PER_WORKING_WEEK: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// The result of calculating annual leave accrual.
#[derive(Debug, Clone)]
pub struct AnnualLeaveResult {
    /// Leave accrued in the period, in hours.
    pub accrued_hours: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the annual leave accrued over one pay period.
///
/// `(20 * fte / 260.87) * working_days_in_period * (full_time_hours / 5)`
///
/// # Arguments
///
/// * `full_time_hours` - Hours in a full-time week
/// * `fte` - Fraction of a full-time role
/// * `pay_frequency` - Determines the working days in the period
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns an `AnnualLeaveResult` containing the hours accrued this period
/// and an audit step.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_annual_leave;
/// use payslip_engine::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// let result = calculate_annual_leave(Decimal::from(38), Decimal::ONE, PayFrequency::Fortnightly, 1);
/// // 20 / 260.87 x 10 days x 7.6 h = 5.83 h
/// assert_eq!(result.accrued_hours.round_dp(2), Decimal::new(583, 2));
/// ```
pub fn calculate_annual_leave(
    full_time_hours: Decimal,
    fte: Decimal,
    pay_frequency: PayFrequency,
    step_number: u32,
) -> AnnualLeaveResult {
    let entitlement_days = ANNUAL_LEAVE_DAYS * fte;
    let daily_accrual = entitlement_days / WORKING_DAYS_PER_YEAR;
    let working_days = pay_frequency.working_days();
    let hours_per_day = full_time_hours / DAYS_PER_WORKING_WEEK;
    let accrued_days = daily_accrual * working_days;
    let accrued_hours = accrued_days * hours_per_day;

    let audit_step = AuditStep {
        step_number,
        rule_id: "annual_leave".to_string(),
        rule_name: "Annual Leave Accrual".to_string(),
        input: serde_json::json!({
            "full_time_hours": full_time_hours.normalize().to_string(),
            "fte": fte.normalize().to_string(),
            "pay_frequency": pay_frequency,
            "entitlement_days": entitlement_days.normalize().to_string()
        }),
        output: serde_json::json!({
            "working_days": working_days.normalize().to_string(),
            "hours_per_day": hours_per_day.normalize().to_string(),
            "accrued_days": accrued_days.normalize().to_string(),
            "accrued_hours": accrued_hours.normalize().to_string()
        }),
        reasoning: format!(
            "{} days / {} working days x {} days x {} h/day = {} h",
            entitlement_days.normalize(),
            WORKING_DAYS_PER_YEAR.normalize(),
            working_days.round_dp(4).normalize(),
            hours_per_day.normalize(),
            accrued_hours.round_dp(4).normalize()
        ),
    };

    AnnualLeaveResult {
        accrued_hours,
        audit_step,
    }
}
