//! Full payslip calculation.
//!
//! [`calculate_payslip`] runs every rule in order and assembles the
//! [`PayrollResult`]. [`compute`] is the form-style entry point that
//! silently yields nothing while the input is incomplete.

use tracing::debug;

use crate::config::TaxTables;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, PayFigures, PayrollInput, PayrollMetadata,
    PayrollResult, RawPayrollInput,
};

use super::{
    calculate_annual_leave, calculate_income_tax, calculate_medicare_levy,
    calculate_medicare_levy_surcharge, calculate_superannuation, calculate_working_hours,
    calculate_year_to_date,
};

/// Calculates a complete payslip.
///
/// The annual figures are derived from the FTE-adjusted salary, then divided
/// by the periods per year. Net pay is gross less income tax, Medicare levy
/// and surcharge; superannuation is reported separately and not deducted.
///
/// # Arguments
///
/// * `input` - The complete payroll input
/// * `tables` - Tax tables keyed by tax year
///
/// # Returns
///
/// Returns a `PayrollResult` holding the per-period, annual and year-to-date
/// figures along with the audit trace of every rule applied.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidInput`] if a numeric field is
/// outside its domain (see [`PayrollInput::validate`]), and
/// [`crate::error::EngineError::TaxYearNotFound`] if the tables have no
/// entry for `input.tax_year`.
///
/// # Examples
///
/// ```
/// use payslip_engine::calculation::calculate_payslip;
/// use payslip_engine::config::ConfigLoader;
/// use payslip_engine::models::{PayFrequency, PayrollInput};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let tables = ConfigLoader::builtin().unwrap().into_tables();
/// let input = PayrollInput {
///     pay_frequency: PayFrequency::Fortnightly,
///     pay_date: NaiveDate::from_ymd_opt(2025, 10, 15).unwrap(),
///     period_end_date: NaiveDate::from_ymd_opt(2025, 10, 12).unwrap(),
///     employment_start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
///     annual_salary: Decimal::from(90000),
///     tax_year: "2025-26".to_string(),
///     full_time_hours: Decimal::from(38),
///     fte: Decimal::ONE,
///     has_private_health_insurance: true,
/// };
///
/// let result = calculate_payslip(&input, &tables).unwrap();
/// assert_eq!(result.annual.income_tax, Decimal::from(17788));
/// assert_eq!(
///     result.net_income,
///     result.gross_pay - result.income_tax - result.total_medicare_charges
/// );
/// ```
pub fn calculate_payslip(input: &PayrollInput, tables: &TaxTables) -> EngineResult<PayrollResult> {
    input.validate()?;
    let year = tables.get(&input.tax_year)?;
    let frequency = input.pay_frequency;
    let periods_per_year = frequency.periods_per_year();

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let effective_annual_salary = input.effective_annual_salary();
    let gross_pay = effective_annual_salary / periods_per_year;
    steps.push(AuditStep {
        step_number,
        rule_id: "gross_pay".to_string(),
        rule_name: "Gross Pay".to_string(),
        input: serde_json::json!({
            "annual_salary": input.annual_salary.normalize().to_string(),
            "fte": input.fte.normalize().to_string(),
            "pay_frequency": frequency
        }),
        output: serde_json::json!({
            "effective_annual_salary": effective_annual_salary.normalize().to_string(),
            "periods_per_year": periods_per_year.normalize().to_string(),
            "gross_pay": gross_pay.normalize().to_string()
        }),
        reasoning: format!(
            "${} x {} FTE = ${}; / {} periods = ${}",
            input.annual_salary.normalize(),
            input.fte.normalize(),
            effective_annual_salary.normalize(),
            periods_per_year.normalize(),
            gross_pay.round_dp(4).normalize()
        ),
    });
    step_number += 1;

    let taxable_income = effective_annual_salary;

    let income_tax = calculate_income_tax(taxable_income, year, step_number)?;
    steps.push(income_tax.audit_step);
    step_number += 1;

    let levy = calculate_medicare_levy(taxable_income, &year.medicare_levy, step_number);
    steps.push(levy.audit_step);
    step_number += 1;

    let surcharge = calculate_medicare_levy_surcharge(
        taxable_income,
        input.has_private_health_insurance,
        year,
        step_number,
    )?;
    steps.push(surcharge.audit_step);
    step_number += 1;

    let annual_super = effective_annual_salary * year.superannuation_rate;
    let annual = PayFigures {
        gross_pay: effective_annual_salary,
        income_tax: income_tax.annual_tax,
        medicare_levy: levy.annual_levy,
        medicare_levy_surcharge: surcharge.annual_surcharge,
        net_income: effective_annual_salary
            - income_tax.annual_tax
            - levy.annual_levy
            - surcharge.annual_surcharge,
        superannuation: annual_super,
    };

    let period_tax = income_tax.annual_tax / periods_per_year;
    let period_levy = levy.annual_levy / periods_per_year;
    let period_surcharge = surcharge.annual_surcharge / periods_per_year;
    let total_medicare_charges = period_levy + period_surcharge;
    let net_income = gross_pay - period_tax - total_medicare_charges;

    let superannuation = calculate_superannuation(gross_pay, year.superannuation_rate, step_number);
    steps.push(superannuation.audit_step);
    step_number += 1;

    let hours = calculate_working_hours(
        input.full_time_hours,
        input.fte,
        frequency,
        effective_annual_salary,
        step_number,
    );
    steps.push(hours.audit_step);
    step_number += 1;

    let leave = calculate_annual_leave(input.full_time_hours, input.fte, frequency, step_number);
    steps.push(leave.audit_step);
    step_number += 1;

    let per_period = PayFigures {
        gross_pay,
        income_tax: period_tax,
        medicare_levy: period_levy,
        medicare_levy_surcharge: period_surcharge,
        net_income,
        superannuation: superannuation.contribution,
    };

    let ytd = calculate_year_to_date(
        input.pay_date,
        input.employment_start_date,
        frequency,
        &per_period,
        &annual,
        step_number,
    );
    steps.push(ytd.audit_step);

    if ytd.starts_after_pay_date {
        warnings.push(AuditWarning {
            code: "EMPLOYMENT_STARTS_AFTER_PAY_DATE".to_string(),
            message: format!(
                "Employment starts {} but pay date is {}; year-to-date totals are zero",
                input.employment_start_date, input.pay_date
            ),
            severity: "medium".to_string(),
        });
    }
    if !ytd.capped_fields.is_empty() && ytd.elapsed_days > 0 {
        warnings.push(AuditWarning {
            code: "YTD_CAPPED".to_string(),
            message: format!(
                "Period count overshoots the pro-rated annual amount for: {}",
                ytd.capped_fields.join(", ")
            ),
            severity: "low".to_string(),
        });
    }

    debug!(
        tax_year = %input.tax_year,
        pay_frequency = %frequency,
        gross_pay = %gross_pay.round_dp(2),
        net_income = %net_income.round_dp(2),
        "Payslip calculated"
    );

    Ok(PayrollResult {
        gross_pay,
        taxable_income,
        income_tax: period_tax,
        medicare_levy: period_levy,
        medicare_levy_surcharge: period_surcharge,
        total_medicare_charges,
        net_income,
        superannuation: superannuation.contribution,
        annual_leave_hours: leave.accrued_hours,
        hours_worked: hours.hours_worked,
        hourly_rate: hours.hourly_rate,
        annual,
        ytd: ytd.ytd,
        metadata: PayrollMetadata {
            tax_year: input.tax_year.clone(),
            pay_frequency: frequency,
            periods_per_year,
            period_days: frequency.period_days(),
            periods_elapsed: ytd.periods_to_date,
            effective_annual_salary,
            period_end_date: input.period_end_date,
            financial_year_start: ytd.financial_year_start,
            ytd_start: ytd.ytd_start,
            elapsed_days: ytd.elapsed_days,
            ytd_proportion: ytd.proportion,
            tax_bracket_index: income_tax.bracket_index,
        },
        audit_trace: AuditTrace { steps, warnings },
    })
}

/// Calculates a payslip from form-style input.
///
/// Returns `None` while any required field is missing or unparseable,
/// when a value is out of range, and when the tax year has no table. Nothing is raised; callers keep
/// whatever result they showed before.
///
/// ```
/// use payslip_engine::calculation::compute;
/// use payslip_engine::config::ConfigLoader;
/// use payslip_engine::models::RawPayrollInput;
///
/// let tables = ConfigLoader::builtin().unwrap().into_tables();
/// assert!(compute(&RawPayrollInput::default(), &tables).is_none());
/// ```
pub fn compute(raw: &RawPayrollInput, tables: &TaxTables) -> Option<PayrollResult> {
    let Some(input) = raw.parse() else {
        debug!("Payroll input incomplete; skipping calculation");
        return None;
    };

    match calculate_payslip(&input, tables) {
        Ok(result) => Some(result),
        Err(err) => {
            debug!(error = %err, "Payroll calculation skipped");
            None
        }
    }
}
