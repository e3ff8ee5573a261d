//! Medicare levy surcharge calculation.
//!
//! The surcharge applies to people without private hospital cover. The tier
//! rate is applied flat to the whole income, not marginally.

use rust_decimal::Decimal;

use crate::config::TaxYearConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// The result of calculating the Medicare levy surcharge, including the audit step.
#[derive(Debug, Clone)]
pub struct MedicareSurchargeResult {
    /// Annual surcharge.
    pub annual_surcharge: Decimal,
    /// The matched tier, or `None` when the employee holds private cover.
    pub tier_index: Option<usize>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the annual Medicare levy surcharge.
///
/// Returns zero regardless of income when `has_private_health_insurance`
/// is true; otherwise `income * rate` of the matching tier.
///
/// # Arguments
///
/// * `taxable_income` - The FTE-adjusted annual income
/// * `has_private_health_insurance` - Whether the employee holds private hospital cover
/// * `year` - The tax year whose surcharge tiers apply
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns a `MedicareSurchargeResult` containing the annual surcharge, the
/// matched tier and an audit step.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTaxTable`] if no tier covers the income.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_medicare_levy_surcharge;
/// use payslip_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let year = loader.tax_year("2025-26").unwrap();
///
/// let covered = calculate_medicare_levy_surcharge(Decimal::from(200000), true, year, 1).unwrap();
/// assert_eq!(covered.annual_surcharge, Decimal::ZERO);
///
/// let uncovered = calculate_medicare_levy_surcharge(Decimal::from(200000), false, year, 1).unwrap();
/// assert_eq!(uncovered.annual_surcharge, Decimal::from(3000));
/// ```
pub fn calculate_medicare_levy_surcharge(
    taxable_income: Decimal,
    has_private_health_insurance: bool,
    year: &TaxYearConfig,
    step_number: u32,
) -> EngineResult<MedicareSurchargeResult> {
    let input = serde_json::json!({
        "taxable_income": taxable_income.normalize().to_string(),
        "has_private_health_insurance": has_private_health_insurance
    });

    if has_private_health_insurance {
        let audit_step = AuditStep {
            step_number,
            rule_id: "medicare_levy_surcharge".to_string(),
            rule_name: "Medicare Levy Surcharge".to_string(),
            input,
            output: serde_json::json!({
                "applies": false,
                "annual_surcharge": "0"
            }),
            reasoning: "Private hospital cover held - no surcharge".to_string(),
        };

        return Ok(MedicareSurchargeResult {
            annual_surcharge: Decimal::ZERO,
            tier_index: None,
            audit_step,
        });
    }

    let (tier_index, tier) = year.surcharge_bracket(taxable_income).ok_or_else(|| {
        EngineError::InvalidTaxTable {
            tax_year: year.tax_year.clone(),
            message: format!("no surcharge tier covers {}", taxable_income),
        }
    })?;

    let annual_surcharge = taxable_income * tier.rate;

    let audit_step = AuditStep {
        step_number,
        rule_id: "medicare_levy_surcharge".to_string(),
        rule_name: "Medicare Levy Surcharge".to_string(),
        input,
        output: serde_json::json!({
            "applies": true,
            "tier_index": tier_index,
            "rate": tier.rate.normalize().to_string(),
            "annual_surcharge": annual_surcharge.normalize().to_string()
        }),
        reasoning: format!(
            "No private hospital cover: ${} x {} (tier {}) = ${}",
            taxable_income.normalize(),
            tier.rate.normalize(),
            tier_index + 1,
            annual_surcharge.normalize()
        ),
    };

    Ok(MedicareSurchargeResult {
        annual_surcharge,
        tier_index: Some(tier_index),
        audit_step,
    })
}
