//! Reference table types for payslip calculation.
//!
//! This module contains the strongly-typed structures that are deserialized
//! from the per-year YAML files under `config/tax_years/`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A contiguous income band with an inclusive lower bound and an optional
/// inclusive upper bound.
///
/// Implemented by both the income tax brackets and the Medicare levy
/// surcharge tiers so they share matching and validation.
pub trait IncomeBand {
    /// The lowest income (inclusive) covered by this band.
    fn min(&self) -> Decimal;
    /// The highest income (inclusive) covered by this band, or `None` if unbounded.
    fn max(&self) -> Option<Decimal>;

    /// Returns true if the band accepts `income` under the `income <= max` rule.
    fn accepts(&self, income: Decimal) -> bool {
        self.max().is_none_or(|max| income <= max)
    }
}

/// A single marginal income tax bracket.
///
/// Tax for an income inside the bracket is `offset + (income - min + 1) * rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lowest income in the bracket.
    pub min: Decimal,
    /// Highest income in the bracket; `None` for the top bracket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    /// Marginal rate applied to income above `min`.
    pub rate: Decimal,
    /// Cumulative tax payable on all income below `min`.
    pub offset: Decimal,
}

impl IncomeBand for TaxBracket {
    fn min(&self) -> Decimal {
        self.min
    }

    fn max(&self) -> Option<Decimal> {
        self.max
    }
}

/// Medicare levy settings for a tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicareLevyConfig {
    /// The full levy rate (e.g. 0.02).
    pub rate: Decimal,
    /// Incomes at or below this pay no levy.
    pub lower_threshold: Decimal,
    /// Incomes above this pay the full rate.
    pub upper_threshold: Decimal,
}

/// A Medicare levy surcharge tier. The rate applies flat to the whole income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeBracket {
    /// Lowest income in the tier.
    pub min: Decimal,
    /// Highest income in the tier; `None` for the top tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    /// Surcharge rate applied to the whole income.
    pub rate: Decimal,
}

impl IncomeBand for SurchargeBracket {
    fn min(&self) -> Decimal {
        self.min
    }

    fn max(&self) -> Option<Decimal> {
        self.max
    }
}

/// The reference table for one tax year, as stored in `<year>.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    /// The financial year key (e.g. "2025-26").
    pub tax_year: String,
    /// Superannuation guarantee rate.
    pub superannuation_rate: Decimal,
    /// Progressive income tax brackets, ascending.
    pub income_tax: Vec<TaxBracket>,
    /// Medicare levy settings.
    pub medicare_levy: MedicareLevyConfig,
    /// Medicare levy surcharge tiers, ascending.
    pub medicare_levy_surcharge: Vec<SurchargeBracket>,
}

impl TaxYearConfig {
    /// Finds the income tax bracket for `income`, returning its index and the bracket.
    pub fn income_tax_bracket(&self, income: Decimal) -> Option<(usize, &TaxBracket)> {
        find_band(&self.income_tax, income)
    }

    /// Finds the surcharge tier for `income`, returning its index and the tier.
    pub fn surcharge_bracket(&self, income: Decimal) -> Option<(usize, &SurchargeBracket)> {
        find_band(&self.medicare_levy_surcharge, income)
    }

    /// Checks the structural rules every table must satisfy.
    ///
    /// Bands must start at zero, be contiguous (`next.min == prev.max + 1`),
    /// and only the last band may be unbounded (and it must be). Rates must
    /// lie in `[0, 1]` and the levy thresholds must be strictly ordered.
    pub fn validate(&self) -> EngineResult<()> {
        validate_bands(&self.tax_year, "income_tax", &self.income_tax)?;
        validate_bands(
            &self.tax_year,
            "medicare_levy_surcharge",
            &self.medicare_levy_surcharge,
        )?;

        let rates = self
            .income_tax
            .iter()
            .map(|b| ("income_tax", b.rate))
            .chain(
                self.medicare_levy_surcharge
                    .iter()
                    .map(|b| ("medicare_levy_surcharge", b.rate)),
            )
            .chain([
                ("medicare_levy", self.medicare_levy.rate),
                ("superannuation_rate", self.superannuation_rate),
            ]);
        for (table, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(self.invalid(format!("{table} rate {rate} is outside [0, 1]")));
            }
        }

        let levy = &self.medicare_levy;
        if levy.lower_threshold >= levy.upper_threshold {
            return Err(self.invalid(format!(
                "medicare_levy lower_threshold {} must be below upper_threshold {}",
                levy.lower_threshold, levy.upper_threshold
            )));
        }

        Ok(())
    }

    fn invalid(&self, message: String) -> EngineError {
        EngineError::InvalidTaxTable {
            tax_year: self.tax_year.clone(),
            message,
        }
    }
}

fn find_band<B: IncomeBand>(bands: &[B], income: Decimal) -> Option<(usize, &B)> {
    bands.iter().enumerate().find(|(_, band)| band.accepts(income))
}

fn validate_bands<B: IncomeBand>(tax_year: &str, table: &str, bands: &[B]) -> EngineResult<()> {
    let invalid = |message: String| EngineError::InvalidTaxTable {
        tax_year: tax_year.to_string(),
        message: format!("{table}: {message}"),
    };

    let first = bands
        .first()
        .ok_or_else(|| invalid("table has no brackets".to_string()))?;
    if first.min() != Decimal::ZERO {
        return Err(invalid(format!("first bracket starts at {}, not 0", first.min())));
    }

    for (index, pair) in bands.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        let prev_max = prev
            .max()
            .ok_or_else(|| invalid(format!("bracket {index} is unbounded but not last")))?;
        if prev_max < prev.min() {
            return Err(invalid(format!("bracket {index} has max below min")));
        }
        if next.min() != prev_max + Decimal::ONE {
            return Err(invalid(format!(
                "bracket {} starts at {} but previous ends at {}",
                index + 1,
                next.min(),
                prev_max
            )));
        }
    }

    if bands.last().and_then(|band| band.max()).is_some() {
        return Err(invalid("last bracket must be unbounded".to_string()));
    }

    Ok(())
}

/// All loaded tax-year tables, keyed by year.
#[derive(Debug, Clone, Default)]
pub struct TaxTables {
    years: BTreeMap<String, TaxYearConfig>,
}

impl TaxTables {
    /// Builds the table set, validating every year.
    pub fn new(years: Vec<TaxYearConfig>) -> EngineResult<Self> {
        let mut map = BTreeMap::new();
        for year in years {
            year.validate()?;
            map.insert(year.tax_year.clone(), year);
        }
        Ok(Self { years: map })
    }

    /// Looks up the table for `tax_year`.
    pub fn get(&self, tax_year: &str) -> EngineResult<&TaxYearConfig> {
        self.years
            .get(tax_year)
            .ok_or_else(|| EngineError::TaxYearNotFound {
                tax_year: tax_year.to_string(),
            })
    }

    /// Returns the loaded tables in ascending year order.
    pub fn years(&self) -> impl Iterator<Item = &TaxYearConfig> {
        self.years.values()
    }

    /// Returns true if a table exists for `tax_year`.
    pub fn contains(&self, tax_year: &str) -> bool {
        self.years.contains_key(tax_year)
    }
}
