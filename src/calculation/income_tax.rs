//! Progressive income tax calculation.
//!
//! This module evaluates the marginal tax brackets of a tax year against an
//! annual taxable income.

use rust_decimal::Decimal;

use crate::config::TaxYearConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// The result of evaluating income tax, including the audit step.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// Annual income tax payable.
    pub annual_tax: Decimal,
    /// Zero-based index of the bracket the income fell into.
    pub bracket_index: usize,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates annual income tax for a taxable income.
///
/// The matched bracket is the first (ascending) whose `max` is at least the
/// income; the top bracket is unbounded. Tax is then
/// `offset + (income - min + 1) * rate`. The `+ 1` means an income sitting
/// exactly on a bracket boundary is taxed in the lower bracket and the next
/// bracket starts one dollar later.
///
/// # Arguments
///
/// * `taxable_income` - The FTE-adjusted annual income
/// * `year` - The tax year whose brackets apply
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// Returns an `IncomeTaxResult` containing the annual tax, the matched
/// bracket index and an audit step.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTaxTable`] if no bracket covers the income,
/// which only happens for tables that skipped validation.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_income_tax;
/// use payslip_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let year = loader.tax_year("2025-26").unwrap();
///
/// let result = calculate_income_tax(Decimal::from(90000), year, 1).unwrap();
/// assert_eq!(result.annual_tax, Decimal::from(17788));
/// assert_eq!(result.bracket_index, 2);
/// ```
pub fn calculate_income_tax(
    taxable_income: Decimal,
    year: &TaxYearConfig,
    step_number: u32,
) -> EngineResult<IncomeTaxResult> {
    let (bracket_index, bracket) = year
        .income_tax_bracket(taxable_income)
        .ok_or_else(|| EngineError::InvalidTaxTable {
            tax_year: year.tax_year.clone(),
            message: format!("no income tax bracket covers {}", taxable_income),
        })?;

    let taxed_amount = taxable_income - bracket.min + Decimal::ONE;
    let annual_tax = bracket.offset + taxed_amount * bracket.rate;

    let bracket_range = match bracket.max {
        Some(max) => format!("${}-${}", bracket.min.normalize(), max.normalize()),
        None => format!("${}+", bracket.min.normalize()),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax".to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "tax_year": year.tax_year
        }),
        output: serde_json::json!({
            "bracket_index": bracket_index,
            "bracket_min": bracket.min.normalize().to_string(),
            "bracket_max": bracket.max.map(|m| m.normalize().to_string()),
            "rate": bracket.rate.normalize().to_string(),
            "offset": bracket.offset.normalize().to_string(),
            "annual_tax": annual_tax.normalize().to_string()
        }),
        reasoning: format!(
            "Bracket {} ({}): ${} + (${} - ${} + 1) x {} = ${}",
            bracket_index + 1,
            bracket_range,
            bracket.offset.normalize(),
            taxable_income.normalize(),
            bracket.min.normalize(),
            bracket.rate.normalize(),
            annual_tax.normalize()
        ),
    };

    Ok(IncomeTaxResult {
        annual_tax,
        bracket_index,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn year_2025_26() -> TaxYearConfig {
        ConfigLoader::builtin()
            .unwrap()
            .tax_year("2025-26")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_tax_free_threshold() {
        let year = year_2025_26();
        for income in ["0", "1", "10000", "18200"] {
            let result = calculate_income_tax(dec(income), &year, 1).unwrap();
            assert_eq!(result.annual_tax, Decimal::ZERO, "income {income}");
            assert_eq!(result.bracket_index, 0);
        }
    }

    #[test]
    fn test_second_bracket() {
        let year = year_2025_26();
        let result = calculate_income_tax(dec("30000"), &year, 1).unwrap();
        // (30000 - 18201 + 1) x 0.16 = 1888
        assert_eq!(result.annual_tax, dec("1888"));
        assert_eq!(result.bracket_index, 1);
    }

    #[test]
    fn test_90000_scenario() {
        let year = year_2025_26();
        let result = calculate_income_tax(dec("90000"), &year, 3).unwrap();

        assert_eq!(result.annual_tax, dec("17788"));
        assert_eq!(result.bracket_index, 2);
        assert_eq!(result.audit_step.step_number, 3);
        assert_eq!(result.audit_step.rule_id, "income_tax");
        assert_eq!(result.audit_step.output["rate"], "0.3");
        assert_eq!(result.audit_step.output["offset"], "4288");
        assert!(result.audit_step.reasoning.contains("$4288"));
        assert!(result.audit_step.reasoning.contains("$17788"));
    }

    #[test]
    fn test_boundary_income_uses_lower_bracket() {
        let year = year_2025_26();
        let at_boundary = calculate_income_tax(dec("45000"), &year, 1).unwrap();
        assert_eq!(at_boundary.bracket_index, 1);
        assert_eq!(at_boundary.annual_tax, dec("4288"));

        let next_dollar = calculate_income_tax(dec("45001"), &year, 1).unwrap();
        assert_eq!(next_dollar.bracket_index, 2);
        // 4288 + (45001 - 45001 + 1) x 0.30
        assert_eq!(next_dollar.annual_tax, dec("4288.30"));
    }

    #[test]
    fn test_offsets_chain_across_brackets() {
        let year = year_2025_26();
        let top_of_third = calculate_income_tax(dec("135000"), &year, 1).unwrap();
        assert_eq!(top_of_third.annual_tax, dec("31288"));

        let top_of_fourth = calculate_income_tax(dec("190000"), &year, 1).unwrap();
        assert_eq!(top_of_fourth.annual_tax, dec("51638"));
    }

    #[test]
    fn test_top_bracket_is_unbounded() {
        let year = year_2025_26();
        let result = calculate_income_tax(dec("250000"), &year, 1).unwrap();
        // 51638 + (250000 - 190001 + 1) x 0.45 = 51638 + 27000
        assert_eq!(result.annual_tax, dec("78638"));
        assert_eq!(result.bracket_index, 4);
        assert!(result.audit_step.output["bracket_max"].is_null());
    }

    #[test]
    fn test_fractional_income_between_bracket_bounds() {
        let year = year_2025_26();
        let result = calculate_income_tax(dec("18200.50"), &year, 1).unwrap();
        assert_eq!(result.bracket_index, 1);
        assert_eq!(result.annual_tax, dec("0.08"));
    }

    #[test]
    fn test_unvalidated_table_without_cover_errors() {
        let mut year = year_2025_26();
        year.income_tax.truncate(1);

        match calculate_income_tax(dec("50000"), &year, 1) {
            Err(EngineError::InvalidTaxTable { tax_year, .. }) => assert_eq!(tax_year, "2025-26"),
            other => panic!("Expected InvalidTaxTable, got {:?}", other),
        }
    }
}
