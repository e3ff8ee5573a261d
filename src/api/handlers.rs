//! HTTP request handlers for the payslip API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_payslip;
use crate::models::PayrollInput;
use crate::usage::PAYROLL_CALCULATOR_TOOL_ID;

use super::request::PayrollRequest;
use super::response::{
    ApiError, ApiErrorResponse, CalculationResponse, TaxYearSummary, UsageResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/tax-years", get(tax_years_handler))
        .route("/usage/:tool_id", get(usage_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a payroll request and returns the calculated payslip.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    let input: PayrollInput = request.into();

    let start_time = Instant::now();
    let result = match calculate_payslip(&input, state.tables()) {
        Ok(result) => result,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            return ApiErrorResponse::from(err).into_response();
        }
    };
    let duration = start_time.elapsed();

    if let Err(err) = state.usage().increment_usage(PAYROLL_CALCULATOR_TOOL_ID) {
        warn!(correlation_id = %correlation_id, error = %err, "Failed to record usage");
    }

    info!(
        correlation_id = %correlation_id,
        tax_year = %input.tax_year,
        pay_frequency = %input.pay_frequency,
        gross_pay = %result.gross_pay.round_dp(2),
        net_income = %result.net_income.round_dp(2),
        duration_us = duration.as_micros(),
        "Calculation completed successfully"
    );

    json_response(StatusCode::OK, CalculationResponse::new(result))
}

/// Handler for GET /tax-years endpoint.
async fn tax_years_handler(State(state): State<AppState>) -> Response {
    let years: Vec<TaxYearSummary> = state
        .tables()
        .years()
        .map(|year| TaxYearSummary {
            tax_year: year.tax_year.clone(),
            superannuation_rate: year.superannuation_rate,
            bracket_count: year.income_tax.len(),
        })
        .collect();

    json_response(StatusCode::OK, years)
}

/// Handler for GET /usage/:tool_id endpoint.
async fn usage_handler(State(state): State<AppState>, Path(tool_id): Path<String>) -> Response {
    match state.usage().get_usage(&tool_id) {
        Ok(count) => json_response(StatusCode::OK, UsageResponse { tool_id, count }),
        Err(err) => {
            warn!(tool_id = %tool_id, error = %err, "Failed to read usage");
            ApiErrorResponse::from(err).into_response()
        }
    }
}
