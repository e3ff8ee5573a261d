//! Medicare levy calculation.
//!
//! Low incomes are exempt, high incomes pay the full rate, and incomes in
//! between are phased in linearly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MedicareLevyConfig;
use crate::models::AuditStep;

/// Which part of the levy schedule an income fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevyBand {
    /// At or below the lower threshold; no levy.
    Exempt,
    /// Between the thresholds; levy tapers in.
    PhaseIn,
    /// Above the upper threshold; full rate.
    Full,
}

/// The result of calculating the Medicare levy, including the audit step.
#[derive(Debug, Clone)]
pub struct MedicareLevyResult {
    /// Annual Medicare levy.
    pub annual_levy: Decimal,
    /// The band the income fell into.
    pub band: LevyBand,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the annual Medicare levy.
///
/// - income <= lower: 0
/// - income > upper: `income * rate`
/// - otherwise: `income * rate * (1 - (upper - income) / (upper - lower))`
///
/// # Arguments
///
/// * `taxable_income` - The FTE-adjusted annual income
/// * `config` - The levy rate and shade-in thresholds for the tax year
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a `MedicareLevyResult` containing the annual levy, the band the
/// income fell into and an audit step.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::{LevyBand, calculate_medicare_levy};
/// use payslip_engine::config::MedicareLevyConfig;
/// use rust_decimal::Decimal;
///
/// let config = MedicareLevyConfig {
///     rate: Decimal::new(2, 2),
///     lower_threshold: Decimal::from(27222),
///     upper_threshold: Decimal::from(34027),
/// };
///
/// let result = calculate_medicare_levy(Decimal::from(90000), &config, 1);
/// assert_eq!(result.annual_levy, Decimal::from(1800));
/// assert_eq!(result.band, LevyBand::Full);
/// ```
pub fn calculate_medicare_levy(
    taxable_income: Decimal,
    config: &MedicareLevyConfig,
    step_number: u32,
) -> MedicareLevyResult {
    let lower = config.lower_threshold;
    let upper = config.upper_threshold;

    let (annual_levy, band, reasoning) = if taxable_income <= lower {
        (
            Decimal::ZERO,
            LevyBand::Exempt,
            format!(
                "${} is at or below the ${} low-income threshold - no levy",
                taxable_income.normalize(),
                lower.normalize()
            ),
        )
    } else if taxable_income > upper {
        let levy = taxable_income * config.rate;
        (
            levy,
            LevyBand::Full,
            format!(
                "${} x {} = ${}",
                taxable_income.normalize(),
                config.rate.normalize(),
                levy.normalize()
            ),
        )
    } else {
        let phase_in = Decimal::ONE - (upper - taxable_income) / (upper - lower);
        let levy = taxable_income * config.rate * phase_in;
        (
            levy,
            LevyBand::PhaseIn,
            format!(
                "${} x {} x {} (phase-in between ${} and ${}) = ${}",
                taxable_income.normalize(),
                config.rate.normalize(),
                phase_in.normalize(),
                lower.normalize(),
                upper.normalize(),
                levy.normalize()
            ),
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "medicare_levy".to_string(),
        rule_name: "Medicare Levy".to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "rate": config.rate.normalize().to_string(),
            "lower_threshold": lower.normalize().to_string(),
            "upper_threshold": upper.normalize().to_string()
        }),
        output: serde_json::json!({
            "band": band,
            "annual_levy": annual_levy.normalize().to_string()
        }),
        reasoning,
    };

    MedicareLevyResult {
        annual_levy,
        band,
        audit_step,
    }
}
