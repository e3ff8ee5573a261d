//! Integration tests for the payslip engine HTTP API.
//!
//! This test suite covers:
//! - Full payslips for each pay frequency
//! - Medicare levy phase-in and the levy surcharge
//! - Part-time (FTE) scaling
//! - Year-to-date capping
//! - The `/tax-years` and `/usage` endpoints
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payslip_engine::api::{AppState, create_router};
use payslip_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/tax_years").expect("Failed to load config");
    AppState::new(config.into_tables())
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post_calculate(router: Router, body: Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri("/calculate")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

fn create_request(
    pay_frequency: &str,
    pay_date: &str,
    annual_salary: &str,
    tax_year: &str,
    has_private_health_insurance: bool,
) -> Value {
    json!({
        "pay_frequency": pay_frequency,
        "pay_date": pay_date,
        "period_end_date": pay_date,
        "employment_start_date": "2020-01-01",
        "annual_salary": annual_salary,
        "tax_year": tax_year,
        "has_private_health_insurance": has_private_health_insurance
    })
}

/// Reads a decimal string field from the result and rounds it to `dp`.
fn field(result: &Value, path: &[&str], dp: u32) -> Decimal {
    let mut value = &result["result"];
    for key in path {
        value = &value[*key];
    }
    let text = value
        .as_str()
        .unwrap_or_else(|| panic!("Expected string at {:?}, got {}", path, value));
    decimal(text).round_dp(dp)
}

fn assert_field(result: &Value, path: &[&str], expected: &str) {
    let expected = decimal(expected);
    let actual = field(result, path, expected.scale());
    assert_eq!(
        actual, expected,
        "Expected {} = {}, got {}",
        path.join("."),
        expected,
        actual
    );
}

// =============================================================================
// SECTION 1: Full payslips
// =============================================================================

#[tokio::test]
async fn test_fortnightly_90000_with_cover() {
    let router = create_router_for_test();
    let request = create_request("fortnightly", "2025-10-15", "90000", "2025-26", true);

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, &["annual", "income_tax"], "17788");
    assert_field(&result, &["gross_pay"], "3449.60");
    assert_field(&result, &["income_tax"], "681.79");
    assert_field(&result, &["medicare_levy"], "68.99");
    assert_field(&result, &["medicare_levy_surcharge"], "0");
    assert_field(&result, &["hours_worked"], "76");
    assert_field(&result, &["superannuation"], "413.95");
    assert_eq!(result["result"]["metadata"]["tax_bracket_index"], 2);
}

#[tokio::test]
async fn test_weekly_2024_25_payslip() {
    // 52180 / 52.18 = 1000 a week
    // Tax: 4288 + (52180 - 45001 + 1) x 0.30 = 6442 a year
    let router = create_router_for_test();
    let request = create_request("weekly", "2024-09-02", "52180", "2024-25", false);

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, &["gross_pay"], "1000");
    assert_field(&result, &["annual", "income_tax"], "6442");
    assert_field(&result, &["income_tax"], "123.46");
    assert_field(&result, &["medicare_levy"], "20.00");
    assert_field(&result, &["net_income"], "856.54");
    assert_field(&result, &["superannuation"], "115");
    assert_field(&result, &["hours_worked"], "38");
    assert_field(&result, &["hourly_rate"], "26.3158");
    assert_field(&result, &["annual_leave_hours"], "2.9133");
}

#[tokio::test]
async fn test_monthly_payslip_in_levy_phase_in() {
    // Tax: (30000 - 18201 + 1) x 0.16 = 1888
    // Levy: 30000 x 0.02 x (1 - (34027 - 30000) / (34027 - 27222)) = 244.94
    let router = create_router_for_test();
    let request = create_request("monthly", "2025-10-31", "30000", "2025-26", false);

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, &["gross_pay"], "2500");
    assert_field(&result, &["annual", "income_tax"], "1888");
    assert_field(&result, &["annual", "medicare_levy"], "244.94");
    assert_field(&result, &["medicare_levy"], "20.41");
    assert_field(&result, &["net_income"], "2322.26");
    assert_eq!(
        result["result"]["audit_trace"]["steps"][2]["output"]["band"],
        "phase_in"
    );
}

#[tokio::test]
async fn test_quarterly_payslip_with_surcharge() {
    // 120000 without cover falls in the 1.25% surcharge tier
    let router = create_router_for_test();
    let request = create_request("quarterly", "2025-09-30", "120000", "2025-26", false);

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, &["gross_pay"], "30000");
    assert_field(&result, &["annual", "income_tax"], "26788");
    assert_field(&result, &["income_tax"], "6697");
    assert_field(&result, &["medicare_levy"], "600");
    assert_field(&result, &["medicare_levy_surcharge"], "375");
    assert_field(&result, &["total_medicare_charges"], "975");
    assert_field(&result, &["net_income"], "22328");
}

#[tokio::test]
async fn test_private_cover_removes_surcharge() {
    let router = create_router_for_test();
    let request = create_request("quarterly", "2025-09-30", "120000", "2025-26", true);

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, &["medicare_levy_surcharge"], "0");
    assert_field(&result, &["total_medicare_charges"], "600");
}

#[tokio::test]
async fn test_low_income_pays_no_tax_or_levy() {
    let router = create_router_for_test();
    let request = create_request("weekly", "2025-10-15", "18200", "2025-26", false);

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, &["income_tax"], "0");
    assert_field(&result, &["medicare_levy"], "0");
    assert_eq!(
        field(&result, &["net_income"], 10),
        field(&result, &["gross_pay"], 10)
    );
}

// =============================================================================
// SECTION 2: Part-time scaling
// =============================================================================

#[tokio::test]
async fn test_half_fte_halves_salary_and_hours() {
    let mut request = create_request("fortnightly", "2025-10-15", "90000", "2025-26", true);
    request["fte"] = json!("0.5");

    let (status, result) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, &["metadata", "effective_annual_salary"], "45000");
    assert_field(&result, &["taxable_income"], "45000");
    assert_field(&result, &["hours_worked"], "38");
    assert_field(&result, &["annual", "income_tax"], "4288");
}

#[tokio::test]
async fn test_custom_full_time_hours() {
    let mut request = create_request("weekly", "2025-10-15", "52180", "2025-26", true);
    request["full_time_hours"] = json!("35");

    let (status, result) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, &["hours_worked"], "35");
    // 52180 / (52.18 x 35)
    assert_field(&result, &["hourly_rate"], "28.5714");
}

#[tokio::test]
async fn test_zero_fte_produces_empty_payslip() {
    let mut request = create_request("monthly", "2025-10-31", "80000", "2025-26", false);
    request["fte"] = json!(0);

    let (status, result) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, &["gross_pay"], "0");
    assert_field(&result, &["net_income"], "0");
    assert_field(&result, &["hourly_rate"], "0");
    assert_field(&result, &["annual_leave_hours"], "0");
}

// =============================================================================
// SECTION 3: Year-to-date
// =============================================================================

#[tokio::test]
async fn test_ytd_is_capped_by_elapsed_days() {
    // 63 days into 2024-25: 10 weekly periods (10000) vs 52180 x 63 / 365.25
    let router = create_router_for_test();
    let request = create_request("weekly", "2024-09-02", "52180", "2024-25", false);

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["result"]["metadata"]["elapsed_days"], 63);
    assert_eq!(result["result"]["metadata"]["periods_elapsed"], 10);
    assert_field(&result, &["ytd", "gross_pay"], "9000.25");

    let warnings = result["result"]["audit_trace"]["warnings"]
        .as_array()
        .unwrap();
    assert!(warnings.iter().any(|w| w["code"] == "YTD_CAPPED"));
}

#[tokio::test]
async fn test_ytd_starts_at_employment_start() {
    let mut request = create_request("fortnightly", "2025-10-15", "90000", "2025-26", true);
    request["employment_start_date"] = json!("2025-10-01");

    let (status, result) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["result"]["metadata"]["ytd_start"], "2025-10-01");
    assert_eq!(result["result"]["metadata"]["elapsed_days"], 14);
    assert_eq!(result["result"]["metadata"]["periods_elapsed"], 2);
}

#[tokio::test]
async fn test_ytd_zero_when_employment_starts_later() {
    let mut request = create_request("weekly", "2025-10-15", "60000", "2025-26", false);
    request["employment_start_date"] = json!("2026-01-05");

    let (status, result) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["result"]["metadata"]["elapsed_days"], 0);
    assert_field(&result, &["ytd", "gross_pay"], "0");
    assert_field(&result, &["ytd", "net_income"], "0");
}

// =============================================================================
// SECTION 4: Response shape and determinism
// =============================================================================

#[tokio::test]
async fn test_response_contains_all_required_fields() {
    let router = create_router_for_test();
    let request = create_request("fortnightly", "2025-10-15", "90000", "2025-26", true);

    let (status, body) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["calculation_id"].is_string());
    assert!(body["timestamp"].is_string());
    assert!(body["engine_version"].is_string());

    let result = &body["result"];
    for key in [
        "gross_pay",
        "taxable_income",
        "income_tax",
        "medicare_levy",
        "medicare_levy_surcharge",
        "total_medicare_charges",
        "net_income",
        "superannuation",
        "annual_leave_hours",
        "hours_worked",
        "hourly_rate",
    ] {
        assert!(result[key].is_string(), "{} should be a decimal string", key);
    }
    assert!(result["annual"].is_object());
    assert!(result["ytd"].is_object());
    assert_eq!(result["metadata"]["pay_frequency"], "fortnightly");
    assert_eq!(result["metadata"]["financial_year_start"], "2025-07-01");

    for step in result["audit_trace"]["steps"].as_array().unwrap() {
        assert!(step["step_number"].is_number());
        assert!(step["rule_id"].is_string());
        assert!(step["reasoning"].is_string());
    }
}

#[tokio::test]
async fn test_identical_requests_give_identical_results() {
    let request = create_request("monthly", "2025-12-31", "123456.78", "2025-26", false);

    let (_, first) = post_calculate(create_router_for_test(), request.clone()).await;
    let (_, second) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(first["result"], second["result"]);
    assert_ne!(first["calculation_id"], second["calculation_id"]);
}

// =============================================================================
// SECTION 5: Reference data and usage
// =============================================================================

#[tokio::test]
async fn test_tax_years_endpoint() {
    let (status, years) = get_json(create_router_for_test(), "/tax-years").await;

    assert_eq!(status, StatusCode::OK);
    let years = years.as_array().unwrap();
    assert_eq!(years.len(), 2);
    assert_eq!(years[0]["tax_year"], "2024-25");
    assert_eq!(years[0]["superannuation_rate"], "0.115");
    assert_eq!(years[1]["tax_year"], "2025-26");
    assert_eq!(years[1]["bracket_count"], 5);
}

#[tokio::test]
async fn test_usage_counts_successful_calculations() {
    let router = create_router_for_test();
    let request = create_request("weekly", "2025-10-15", "52180", "2025-26", true);

    for _ in 0..3 {
        let (status, _) = post_calculate(router.clone(), request.clone()).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, usage) = get_json(router.clone(), "/usage/payroll-calculator").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usage["tool_id"], "payroll-calculator");
    assert_eq!(usage["count"], 3);

    let (_, other) = get_json(router, "/usage/something-else").await;
    assert_eq!(other["count"], 0);
}

// =============================================================================
// SECTION 6: Error cases
// =============================================================================

#[tokio::test]
async fn test_error_malformed_json() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from("{\"pay_frequency\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_missing_salary() {
    let mut request = create_request("weekly", "2025-10-15", "52180", "2025-26", true);
    request.as_object_mut().unwrap().remove("annual_salary");

    let (status, error) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("annual_salary"));
}

#[tokio::test]
async fn test_error_unknown_pay_frequency() {
    let request = create_request("daily", "2025-10-15", "52180", "2025-26", true);

    let (status, error) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_unknown_tax_year() {
    let request = create_request("weekly", "2025-10-15", "52180", "2019-20", true);

    let (status, error) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "TAX_YEAR_NOT_FOUND");
    assert!(error["message"].as_str().unwrap().contains("2019-20"));
}

#[tokio::test]
async fn test_error_negative_salary() {
    let request = create_request("weekly", "2025-10-15", "-100", "2025-26", true);

    let (status, error) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
    assert!(error["message"].as_str().unwrap().contains("annual_salary"));
}

#[tokio::test]
async fn test_error_does_not_count_usage() {
    let router = create_router_for_test();
    let request = create_request("weekly", "2025-10-15", "52180", "2019-20", true);

    let (status, _) = post_calculate(router.clone(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, usage) = get_json(router, "/usage/payroll-calculator").await;
    assert_eq!(usage["count"], 0);
}
