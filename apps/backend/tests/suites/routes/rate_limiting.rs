use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use crate::support::app_builder::{build_test_app, test_state_builder};

#[actix_web::test]
async fn auth_routes_throttle_after_ten_requests() {
    let state = test_state_builder()
        .with_rate_limit(true)
        .build()
        .await
        .unwrap();
    let app = build_test_app(state).await;

    for _ in 0..10 {
        let req = test::TestRequest::post()
            .uri("/auth/verify")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key("x-ratelimit-limit"));
    }

    let req = test::TestRequest::post()
        .uri("/auth/verify")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("x-trace-id"));

    // Health sits outside every throttled scope.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
