use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_body;
use serde_json::{json, Value};

use crate::support::app_builder::create_test_app;
use crate::support::auth::bearer_header;

#[actix_web::test]
async fn match_is_created_once_per_pair() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/matches")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({ "userId1": "google_1", "userId2": "apple_2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first: Value = test::read_body_json(resp).await;
    assert_eq!(first["created"], true);

    // Same pair from the other side.
    let req = test::TestRequest::post()
        .uri("/matches")
        .insert_header((AUTHORIZATION, bearer_header("apple_2")))
        .set_json(json!({ "userId1": "apple_2", "userId2": "google_1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second: Value = test::read_body_json(resp).await;
    assert_eq!(second["created"], false);
    assert_eq!(second["match"]["id"], first["match"]["id"]);
}

#[actix_web::test]
async fn match_rules_are_enforced() {
    let app = create_test_app().await;
    let cases = [
        (
            json!({ "userId1": "google_1", "userId2": "google_1" }),
            StatusCode::BAD_REQUEST,
            "INVALID_SELF_REFERENCE",
        ),
        (
            json!({ "userId1": "apple_9", "userId2": "google_1" }),
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
        ),
        (json!({ "userId1": "google_1" }), StatusCode::BAD_REQUEST, "MISSING_FIELD"),
        (json!({ "userId2": "apple_2" }), StatusCode::BAD_REQUEST, "MISSING_FIELD"),
        (
            json!({ "userId1": "google_1", "userId2": "somebody" }),
            StatusCode::BAD_REQUEST,
            "INVALID_USER_ID",
        ),
        (
            json!({ "userId1": "google_1", "userId2": " google_1" }),
            StatusCode::BAD_REQUEST,
            "INVALID_SELF_REFERENCE",
        ),
        (
            json!({ "userId1": " google_1 ", "userId2": "google_1\t" }),
            StatusCode::BAD_REQUEST,
            "INVALID_SELF_REFERENCE",
        ),
        (
            json!({ "userId1": "google_1", "userId2": "GOOGLE_1" }),
            StatusCode::BAD_REQUEST,
            "INVALID_USER_ID",
        ),
    ];
    for (body, status, code) in cases {
        let req = test::TestRequest::post()
            .uri("/matches")
            .insert_header((AUTHORIZATION, bearer_header("google_1")))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_error_body(resp, status, code).await;
    }
}

#[actix_web::test]
async fn blocked_pair_cannot_match() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/blocks")
        .insert_header((AUTHORIZATION, bearer_header("apple_2")))
        .set_json(json!({ "userId": "apple_2", "blockedUserId": "google_1", "reason": "spam" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["block"]["blockedUserId"], "google_1");

    let req = test::TestRequest::post()
        .uri("/matches")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({ "userId1": "google_1", "userId2": "apple_2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body(resp, StatusCode::CONFLICT, "CONFLICT").await;
}

#[actix_web::test]
async fn reports_need_a_known_reason() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/reports")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({
            "reporterId": "google_1",
            "reportedUserId": "apple_2",
            "reason": "harassment",
            "details": "  rude messages  ",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Report submitted");
    assert_eq!(body["report"]["reason"], "harassment");
    assert_eq!(body["report"]["details"], "rude messages");

    for reason in [json!("rude"), json!(null)] {
        let req = test::TestRequest::post()
            .uri("/reports")
            .insert_header((AUTHORIZATION, bearer_header("google_1")))
            .set_json(json!({
                "reporterId": "google_1",
                "reportedUserId": "apple_2",
                "reason": reason,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_error_body(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    }

    let req = test::TestRequest::post()
        .uri("/reports")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({
            "reporterId": "apple_2",
            "reportedUserId": "google_3",
            "reason": "spam",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_error_body(resp, StatusCode::FORBIDDEN, "FORBIDDEN").await;
    assert_eq!(body.error, "Forbidden: Cannot report on behalf of other users");
}

#[actix_web::test]
async fn block_lists_are_private() {
    let app = create_test_app().await;

    for blocked in ["apple_2", "apple_2", "google_3"] {
        let req = test::TestRequest::post()
            .uri("/blocks")
            .insert_header((AUTHORIZATION, bearer_header("google_1")))
            .set_json(json!({ "userId": "google_1", "blockedUserId": blocked }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/blocks/google_1")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);

    let req = test::TestRequest::get()
        .uri("/blocks/google_1")
        .insert_header((AUTHORIZATION, bearer_header("apple_2")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_error_body(resp, StatusCode::FORBIDDEN, "FORBIDDEN").await;
    assert_eq!(body.error, "Forbidden: Cannot view other users' block lists");

    let req = test::TestRequest::post()
        .uri("/blocks")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({ "userId": "google_1", "blockedUserId": "google_1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_error_body(resp, StatusCode::BAD_REQUEST, "INVALID_SELF_REFERENCE").await;
    assert_eq!(body.error, "Cannot block yourself");
}

#[actix_web::test]
async fn chat_routes_require_a_token() {
    let app = create_test_app().await;
    let req = test::TestRequest::post()
        .uri("/matches")
        .set_json(json!({ "userId1": "google_1", "userId2": "apple_2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "MALFORMED_HEADER").await;
}

#[actix_web::test]
async fn padded_self_ids_cannot_report_or_block_yourself() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/reports")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({
            "reporterId": "google_1",
            "reportedUserId": "google_1 ",
            "reason": "spam",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_error_body(resp, StatusCode::BAD_REQUEST, "INVALID_SELF_REFERENCE").await;
    assert_eq!(body.error, "Cannot report yourself");

    let req = test::TestRequest::post()
        .uri("/blocks")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({ "userId": "google_1", "blockedUserId": "  google_1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_error_body(resp, StatusCode::BAD_REQUEST, "INVALID_SELF_REFERENCE").await;
    assert_eq!(body.error, "Cannot block yourself");

    // Nothing was stored under the padded spelling.
    let req = test::TestRequest::get()
        .uri("/blocks/google_1")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 0);
}

#[actix_web::test]
async fn padded_counterparty_is_stored_canonical() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/blocks")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({ "userId": " google_1", "blockedUserId": "apple_2 " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["block"]["blockedUserId"], "apple_2");

    let req = test::TestRequest::post()
        .uri("/matches")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({ "userId1": "google_1", "userId2": "\tapple_2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body(resp, StatusCode::CONFLICT, "CONFLICT").await;
}
