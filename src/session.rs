//! Recompute-on-change payroll session.
//!
//! A [`PayrollSession`] owns one form-style input record. Every field update
//! reruns the whole calculation and swaps in the new result; an incomplete
//! record leaves the last good result in place.

use std::sync::Arc;

use tracing::debug;

use crate::calculation::compute;
use crate::config::TaxTables;
use crate::models::{InputField, PayrollResult, RawPayrollInput};

/// A single user's in-progress payroll calculation.
///
/// ```
/// use std::sync::Arc;
/// use payslip_engine::config::ConfigLoader;
/// use payslip_engine::models::InputField;
/// use payslip_engine::session::PayrollSession;
///
/// let tables = Arc::new(ConfigLoader::builtin().unwrap().into_tables());
/// let mut session = PayrollSession::new(tables);
///
/// session.update(InputField::PayFrequency, "weekly");
/// session.update(InputField::PayDate, "2025-10-15");
/// session.update(InputField::PeriodEndDate, "2025-10-12");
/// session.update(InputField::EmploymentStartDate, "2020-01-01");
/// session.update(InputField::TaxYear, "2025-26");
/// assert!(session.result().is_none());
///
/// session.update(InputField::AnnualSalary, "52180");
/// assert!(session.result().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct PayrollSession {
    tables: Arc<TaxTables>,
    input: RawPayrollInput,
    result: Option<Arc<PayrollResult>>,
}

impl PayrollSession {
    /// Starts a session with default input and no result.
    pub fn new(tables: Arc<TaxTables>) -> Self {
        Self {
            tables,
            input: RawPayrollInput::default(),
            result: None,
        }
    }

    /// Replaces one input field and recomputes.
    ///
    /// Returns true if a new result replaced the previous one.
    pub fn update(&mut self, field: InputField, value: &str) -> bool {
        self.input.set(field, value);
        match compute(&self.input, &self.tables) {
            Some(result) => {
                self.result = Some(Arc::new(result));
                true
            }
            None => {
                debug!(?field, "Input incomplete; keeping previous result");
                false
            }
        }
    }

    /// The latest complete result, if any.
    pub fn result(&self) -> Option<Arc<PayrollResult>> {
        self.result.clone()
    }

    /// The current input record.
    pub fn input(&self) -> &RawPayrollInput {
        &self.input
    }

    /// Resets the input to defaults and drops the result.
    pub fn clear(&mut self) {
        self.input = RawPayrollInput::default();
        self.result = None;
    }
}
