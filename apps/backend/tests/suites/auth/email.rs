use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_body;
use backend_test_support::unique_helpers::unique_email;
use dating_backend::providers::email::test_params;
use serde_json::{json, Value};

use crate::support::app_builder::{build_test_app, create_test_app, test_state_builder};

async fn email_app() -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let state = test_state_builder()
        .with_email_signin(test_params())
        .build()
        .await
        .unwrap();
    build_test_app(state).await
}

#[actix_web::test]
async fn register_then_log_in() {
    let app = email_app().await;
    let email = unique_email("reg");

    let req = test::TestRequest::post()
        .uri("/auth/email/register")
        .set_json(json!({ "email": email.to_uppercase(), "password": "open1sesame" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let registered: Value = test::read_body_json(resp).await;
    assert_eq!(registered["provider"], "email");
    let user_id = registered["userId"].as_str().unwrap().to_string();
    assert!(user_id.starts_with("email_"), "{user_id}");

    let req = test::TestRequest::post()
        .uri("/auth/email/login")
        .set_json(json!({ "email": email, "password": "open1sesame" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["userId"], user_id.as_str());
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["user"]["userId"], user_id.as_str());
    assert_eq!(me["user"]["email"], email.to_lowercase());
}

#[actix_web::test]
async fn bad_logins_are_indistinguishable() {
    let app = email_app().await;
    let email = unique_email("login");

    let req = test::TestRequest::post()
        .uri("/auth/email/register")
        .set_json(json!({ "email": email, "password": "right1answer" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    for (email, password) in [
        (email.as_str(), "wrong1answer"),
        ("nobody@example.com", "right1answer"),
    ] {
        let req = test::TestRequest::post()
            .uri("/auth/email/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body =
            assert_error_body(resp, StatusCode::UNAUTHORIZED, "PROVIDER_VERIFICATION_FAILED").await;
        assert_eq!(body.error, "Identity provider verification failed");
    }
}

#[actix_web::test]
async fn registration_rules() {
    let app = email_app().await;
    let taken = unique_email("taken");

    let req = test::TestRequest::post()
        .uri("/auth/email/register")
        .set_json(json!({ "email": taken, "password": "first1pass" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let cases = [
        (
            json!({ "email": taken.to_uppercase(), "password": "second2pass" }),
            StatusCode::CONFLICT,
            "CONFLICT",
        ),
        (
            json!({ "email": unique_email("weak"), "password": "password" }),
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
        ),
        (
            json!({ "email": unique_email("short"), "password": "a1" }),
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
        ),
        (
            json!({ "email": "not-an-email", "password": "long1enough" }),
            StatusCode::BAD_REQUEST,
            "INVALID_EMAIL",
        ),
        (
            json!({ "email": unique_email("nopass") }),
            StatusCode::BAD_REQUEST,
            "MISSING_FIELD",
        ),
        (
            json!({ "password": "long1enough" }),
            StatusCode::BAD_REQUEST,
            "MISSING_FIELD",
        ),
    ];
    for (body, status, code) in cases {
        let req = test::TestRequest::post()
            .uri("/auth/email/register")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_error_body(resp, status, code).await;
    }
}

#[actix_web::test]
async fn weak_password_lists_every_broken_rule() {
    let app = email_app().await;
    let req = test::TestRequest::post()
        .uri("/auth/email/register")
        .set_json(json!({ "email": unique_email("rules"), "password": "1234" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_error_body(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    assert_eq!(
        body.error,
        "Password must be at least 8 characters; Password must contain at least one letter"
    );
}

#[actix_web::test]
async fn email_routes_fail_closed_when_disabled() {
    let app = create_test_app().await;
    for uri in ["/auth/email/register", "/auth/email/login"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(json!({ "email": "a@example.com", "password": "open1sesame" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_error_body(resp, StatusCode::UNAUTHORIZED, "PROVIDER_VERIFICATION_FAILED").await;
    }
}
