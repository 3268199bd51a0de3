#![allow(dead_code)]

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test;
use serde_json::Value;

// Logging is auto-installed for every test binary that includes `common`.
#[ctor::ctor]
fn init_logging() {
    backend_test_support::test_logging::init();
}

/// Assert a response is an RFC 7807 problem with the given status and code,
/// and return its parsed body.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
) -> Value {
    assert_eq!(resp.status().as_u16(), expected_status);

    let headers = resp.headers().clone();
    let trace_id = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present")
        .to_string();
    assert!(!trace_id.is_empty());

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let body: Value = test::read_body_json(resp).await;
    for key in ["type", "title", "status", "detail", "code", "trace_id"] {
        assert!(body.get(key).is_some(), "{key} field should be present");
    }
    assert_eq!(body["code"], expected_code);
    assert_eq!(body["status"], expected_status);
    assert_eq!(body["trace_id"], trace_id.as_str());
    assert_eq!(
        body["type"],
        format!("https://werewolf.app/errors/{expected_code}").as_str()
    );
    body
}
