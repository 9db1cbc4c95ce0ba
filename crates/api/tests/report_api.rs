//! Integration tests for report request validation at the HTTP boundary.
//!
//! Unknown formats and malformed filters must be rejected before any row
//! is fetched or byte written, so these run without a database.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use serde_json::json;

#[tokio::test]
async fn unknown_file_type_is_rejected_before_any_output() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/orders/_report", json!({ "file_type": "pdf" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UNSUPPORTED_FORMAT");
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("pdf"));
    assert!(message.contains("csv, xlsx"));
}

#[tokio::test]
async fn malformed_customer_filter_is_rejected() {
    let app = common::build_test_app();
    let response =
        post_json(app, "/api/orders/_report", json!({ "customer_id": "nope" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_PARAMETER");
    assert!(body["error"].as_str().unwrap().contains("Invalid UUID format"));
}

#[tokio::test]
async fn unknown_status_filter_is_rejected_with_allowed_values() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/orders/_report", json!({ "status": "BOGUS" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("BOGUS"));
    assert!(message.contains("CANCELED"));
}

#[tokio::test]
async fn unknown_payment_filter_is_rejected() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/orders/_report",
        json!({ "payment_method": "IOU" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
