//! Error body test helpers
//!
//! Assertions for the stable error contract shared by every service:
//! `{"success": false, "error": "<message>", "code": "<CODE>"}` plus an
//! `x-trace-id` response header. Kept independent of backend types so the
//! contract is checked from the outside.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Local mirror of the backend's error body.
#[derive(Debug, Deserialize)]
pub struct ErrorBodyLike {
    pub success: bool,
    pub error: String,
    pub code: String,
}

/// Assert that response parts conform to the error contract and return the
/// parsed body for further checks.
pub fn assert_error_body_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_status: StatusCode,
    expected_code: &str,
) -> ErrorBodyLike {
    assert_eq!(status, expected_status, "unexpected HTTP status");

    let body_str =
        String::from_utf8(body_bytes.to_vec()).expect("Response body should be valid UTF-8");
    let body: ErrorBodyLike = serde_json::from_str(&body_str)
        .unwrap_or_else(|e| panic!("Response body should be an error body ({e}): {body_str}"));

    assert!(!body.success, "error bodies must carry success=false");
    assert_eq!(body.code, expected_code);
    assert!(!body.error.is_empty(), "error message should not be empty");

    let trace_id = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert!(!trace_id.is_empty(), "x-trace-id header should not be empty");

    if expected_status == StatusCode::UNAUTHORIZED {
        let challenge = headers
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert_eq!(challenge, "Bearer", "401 responses must challenge with Bearer");
    }

    body
}

/// Assert that a ServiceResponse conforms to the error contract.
pub async fn assert_error_body(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
) -> ErrorBodyLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_error_body_from_parts(status, &headers, &body, expected_status, expected_code)
}
