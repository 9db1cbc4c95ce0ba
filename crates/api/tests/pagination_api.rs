//! Integration tests for the pagination/sort guard at the HTTP boundary.
//!
//! Every request here is rejected by the guard before any query runs, so
//! no database is required.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};

// ---------------------------------------------------------------------------
// page / size validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn negative_page_is_rejected_naming_the_field() {
    let app = common::build_test_app();
    let response = get(app, "/api/customers?page=-1&size=10").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_PARAMETER");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("'page'"));
    assert!(message.contains("-1"));
}

#[tokio::test]
async fn non_numeric_size_is_rejected_naming_the_field() {
    let app = common::build_test_app();
    let response = get(app, "/api/orders?size=abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("'size'"));
    assert!(message.contains("abc"));
}

#[tokio::test]
async fn negative_size_is_rejected() {
    let app = common::build_test_app();
    let response = get(app, "/api/orders?size=-5").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// sort whitelists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn customer_sort_outside_whitelist_is_rejected_with_allowed_set() {
    let app = common::build_test_app();
    let response = get(app, "/api/customers?sort=email").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("'email'"));
    assert!(message.contains("first_name"));
    assert!(message.contains("not allowed"));
}

#[tokio::test]
async fn order_sort_outside_whitelist_is_rejected() {
    let app = common::build_test_app();
    let response = get(app, "/api/orders?sort=created_at:desc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("'created_at'"));
    assert!(message.contains("amount"));
}

#[tokio::test]
async fn first_offending_sort_term_is_reported() {
    let app = common::build_test_app();
    let response = get(app, "/api/orders?sort=amount:desc,email,status").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("'email'"));
}

#[tokio::test]
async fn unknown_sort_direction_is_rejected() {
    let app = common::build_test_app();
    let response = get(app, "/api/orders?sort=amount:sideways").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("sideways"));
}
