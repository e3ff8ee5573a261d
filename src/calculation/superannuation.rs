//! Superannuation guarantee calculation.

use rust_decimal::Decimal;

use crate::models::AuditStep;

/// The result of calculating superannuation, including the audit step.
#[derive(Debug, Clone)]
pub struct SuperannuationResult {
    /// Employer contribution for the period.
    pub contribution: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employer superannuation contribution on a period's gross pay.
///
/// The contribution is paid on top of salary and is not deducted from net pay.
///
/// # Arguments
///
/// * `gross_pay` - Gross pay for the period
/// * `super_rate` - The superannuation guarantee rate (e.g. 0.12)
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a `SuperannuationResult` containing the contribution and an audit step.
///
/// ```
/// use payslip_engine::calculation::calculate_superannuation;
/// use rust_decimal::Decimal;
///
/// let result = calculate_superannuation(Decimal::from(1000), Decimal::new(12, 2), 1);
/// assert_eq!(result.contribution, Decimal::from(120));
/// ```
pub fn calculate_superannuation(
    gross_pay: Decimal,
    super_rate: Decimal,
    step_number: u32,
) -> SuperannuationResult {
    let contribution = gross_pay * super_rate;

    let audit_step = AuditStep {
        step_number,
        rule_id: "superannuation".to_string(),
        rule_name: "Superannuation Guarantee".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.normalize().to_string(),
            "super_rate": super_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "contribution": contribution.normalize().to_string()
        }),
        reasoning: format!(
            "${} x {} = ${}",
            gross_pay.normalize(),
            super_rate.normalize(),
            contribution.normalize()
        ),
    };

    SuperannuationResult {
        contribution,
        audit_step,
    }
}
