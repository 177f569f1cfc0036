use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use crate::support::app_builder::create_test_app;

#[actix_web::test]
async fn health_is_public_and_traced() {
    let app = create_test_app().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers();
    assert!(headers.contains_key("x-trace-id"));
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "dating-backend");
}

#[actix_web::test]
async fn each_request_gets_its_own_trace_id() {
    let app = create_test_app().await;
    let mut ids = Vec::new();
    for _ in 0..2 {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        ids.push(resp.headers().get("x-trace-id").unwrap().to_str().unwrap().to_string());
    }
    assert_ne!(ids[0], ids[1]);
}
