//! Pay frequency model.
//!
//! This module defines the [`PayFrequency`] enum and the fixed lookups that
//! turn an annual figure into a per-period one.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// How often an employee is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Paid every week.
    Weekly,
    /// Paid every two weeks.
    Fortnightly,
    /// Paid once a month.
    Monthly,
    /// Paid once a quarter.
    Quarterly,
}

impl PayFrequency {
    /// All frequencies, shortest period first.
    pub const ALL: [PayFrequency; 4] = [
        PayFrequency::Weekly,
        PayFrequency::Fortnightly,
        PayFrequency::Monthly,
        PayFrequency::Quarterly,
    ];

    /// Number of pay periods in a year.
    ///
    /// These are fixed approximations (52.18 weeks a year), not a calendar count.
    ///
    /// ```
    /// use payslip_engine::models::PayFrequency;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(PayFrequency::Fortnightly.periods_per_year(), Decimal::new(2609, 2));
    /// ```
    pub fn periods_per_year(self) -> Decimal {
        match self {
            PayFrequency::Weekly => Decimal::new(5218, 2),
            PayFrequency::Fortnightly => Decimal::new(2609, 2),
            PayFrequency::Monthly => Decimal::from(12),
            PayFrequency::Quarterly => Decimal::from(4),
        }
    }

    /// Length of one pay period in calendar days.
    pub fn period_days(self) -> Decimal {
        match self {
            PayFrequency::Weekly => Decimal::from(7),
            PayFrequency::Fortnightly => Decimal::from(14),
            PayFrequency::Monthly => Decimal::new(3044, 2),
            PayFrequency::Quarterly => Decimal::new(9131, 2),
        }
    }

    /// Working (Monday to Friday) days in one pay period.
    pub fn working_days(self) -> Decimal {
        self.period_days() * Decimal::from(5) / Decimal::from(7)
    }

    /// The lowercase name used in requests and tables.
    pub fn as_str(self) -> &'static str {
        match self {
            PayFrequency::Weekly => "weekly",
            PayFrequency::Fortnightly => "fortnightly",
            PayFrequency::Monthly => "monthly",
            PayFrequency::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayFrequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(PayFrequency::Weekly),
            "fortnightly" => Ok(PayFrequency::Fortnightly),
            "monthly" => Ok(PayFrequency::Monthly),
            "quarterly" => Ok(PayFrequency::Quarterly),
            other => Err(EngineError::InvalidInput {
                field: "pay_frequency".to_string(),
                message: format!("unknown pay frequency '{}'", other),
            }),
        }
    }
}
