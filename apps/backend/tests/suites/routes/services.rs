use std::collections::BTreeSet;

use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use dating_backend::config::ServiceGroup;
use serde_json::Value;

use crate::support::app_builder::{build_test_app, test_state_builder};
use crate::support::auth::bearer_header;

#[actix_web::test]
async fn only_selected_groups_are_mounted() {
    let state = test_state_builder()
        .with_services(BTreeSet::from([ServiceGroup::Auth]))
        .with_service_name("auth")
        .build()
        .await
        .unwrap();
    let app = build_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/profiles/discover")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post().uri("/matches").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/auth/verify")
        .set_json(serde_json::json!({}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["service"], "auth");
}
