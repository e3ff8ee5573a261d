//! Response types for the payslip API.
//!
//! This module defines the success envelope, the error body, and the
//! mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::PayrollResult;

/// Successful `/calculate` response.
///
/// The identifier and timestamp belong to the envelope only; the embedded
/// result is the same for identical inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// The calculated payslip.
    pub result: PayrollResult,
}

impl CalculationResponse {
    /// Wraps a result in a fresh envelope.
    pub fn new(result: PayrollResult) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            result,
        }
    }
}

/// One entry of the `/tax-years` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxYearSummary {
    /// Tax year key.
    pub tax_year: String,
    /// Superannuation guarantee rate.
    pub superannuation_rate: Decimal,
    /// Number of income tax brackets.
    pub bracket_count: usize,
}

/// `/usage/{tool_id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageResponse {
    /// The tool the count belongs to.
    pub tool_id: String,
    /// Number of recorded uses.
    pub count: u64,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a tax year not found error response.
    pub fn tax_year_not_found(tax_year: &str) -> Self {
        Self::with_details(
            "TAX_YEAR_NOT_FOUND",
            format!("Tax year not found: {}", tax_year),
            format!("No tax tables are loaded for '{}'", tax_year),
        )
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidTaxTable { tax_year, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    format!("Invalid tax table for '{}'", tax_year),
                    message,
                ),
            },
            EngineError::TaxYearNotFound { tax_year } => {
                ApiErrorResponse::bad_request(ApiError::tax_year_not_found(&tax_year))
            }
            EngineError::InvalidInput { field, message } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_INPUT",
                    format!("Invalid input field '{}': {}", field, message),
                    "The payroll input contains an out-of-range value",
                ))
            }
            EngineError::UsageStore { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("USAGE_STORE_ERROR", "Usage store failure", message),
            },
        }
    }
}
