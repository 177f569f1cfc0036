use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_body;
use backend_test_support::unique_helpers::{unique_email, unique_subject};
use dating_backend::providers::ProviderRegistry;
use serde_json::{json, Value};

use crate::support::app_builder::{build_test_app, create_test_app, test_state_builder};
use crate::support::auth::tamper_last_char;
use crate::support::fake_provider::proof;

#[actix_web::test]
async fn google_sign_in_issues_a_usable_token() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/auth/google")
        .set_json(json!({ "idToken": proof("42", "  Alice@Example.com ") }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["userId"], "google_42");
    assert_eq!(body["provider"], "google");
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["user"]["userId"], "google_42");
    assert_eq!(me["user"]["email"], "alice@example.com");
    assert_eq!(me["user"]["provider"], "google");
}

#[actix_web::test]
async fn apple_sign_in_prefixes_the_subject() {
    let app = create_test_app().await;
    let subject = unique_subject("apple");

    let req = test::TestRequest::post()
        .uri("/auth/apple")
        .set_json(json!({ "identityToken": proof(&subject, &unique_email("pat")) }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["userId"], format!("apple_{subject}"));
    assert_eq!(body["provider"], "apple");
}

#[actix_web::test]
async fn repeated_sign_in_keeps_the_same_user() {
    let app = create_test_app().await;
    let mut ids = Vec::new();
    for email in ["first@example.com", "second@example.com"] {
        let req = test::TestRequest::post()
            .uri("/auth/google")
            .set_json(json!({ "idToken": proof("7", email) }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(body["userId"].as_str().unwrap().to_string());
    }
    assert_eq!(ids[0], ids[1]);
}

#[actix_web::test]
async fn missing_proof_is_a_missing_field() {
    let app = create_test_app().await;
    for (uri, body) in [
        ("/auth/google", json!({})),
        ("/auth/google", json!({ "idToken": "  " })),
        ("/auth/apple", json!({ "idToken": "wrong-field" })),
    ] {
        let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_error_body(resp, StatusCode::BAD_REQUEST, "MISSING_FIELD").await;
    }
}

#[actix_web::test]
async fn rejected_proof_is_401() {
    let app = create_test_app().await;
    let req = test::TestRequest::post()
        .uri("/auth/google")
        .set_json(json!({ "idToken": "forged" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_error_body(resp, StatusCode::UNAUTHORIZED, "PROVIDER_VERIFICATION_FAILED").await;
    assert!(!body.error.contains("signature check failed"));
}

#[actix_web::test]
async fn disabled_provider_is_401() {
    let state = test_state_builder()
        .with_providers(ProviderRegistry::new())
        .build()
        .await
        .unwrap();
    let app = build_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/auth/apple")
        .set_json(json!({ "identityToken": proof("1", "a@example.com") }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "PROVIDER_VERIFICATION_FAILED").await;
}

#[actix_web::test]
async fn loopback_email_is_refused() {
    let app = create_test_app().await;
    let req = test::TestRequest::post()
        .uri("/auth/google")
        .set_json(json!({ "idToken": proof("9", "root@localhost") }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body(resp, StatusCode::BAD_REQUEST, "INVALID_EMAIL").await;
}

#[actix_web::test]
async fn verify_endpoint_decodes_body_tokens() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/auth/google")
        .set_json(json!({ "idToken": proof("42", "alice@example.com") }))
        .to_request();
    let issued: Value = test::call_and_read_body_json(&app, req).await;
    let token = issued["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/auth/verify")
        .set_json(json!({ "token": token }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["decoded"]["userId"], "google_42");
    assert_eq!(body["decoded"]["email"], "alice@example.com");
    let iat = body["decoded"]["iat"].as_i64().unwrap();
    assert_eq!(body["decoded"]["exp"].as_i64().unwrap() - iat, 7 * 24 * 60 * 60);

    let req = test::TestRequest::post()
        .uri("/auth/verify")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "MISSING_TOKEN").await;

    let req = test::TestRequest::post()
        .uri("/auth/verify")
        .set_json(json!({ "token": tamper_last_char(&token) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE").await;
}
