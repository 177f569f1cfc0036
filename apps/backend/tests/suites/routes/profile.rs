use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_body;
use serde_json::{json, Value};

use crate::support::app_builder::create_test_app;
use crate::support::auth::bearer_header;

#[actix_web::test]
async fn create_ignores_body_user_id() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/profile")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({ "userId": "google_999", "name": "Sam", "age": 29 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["profile"]["userId"], "google_1");
    assert_eq!(body["profile"]["name"], "Sam");
    assert_eq!(body["profile"]["photos"], json!([]));

    let req = test::TestRequest::get()
        .uri("/profile/google_999")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body(resp, StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND").await;
}

#[actix_web::test]
async fn second_create_is_a_conflict() {
    let app = create_test_app().await;
    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/profile")
            .insert_header((AUTHORIZATION, bearer_header("google_1")))
            .set_json(json!({ "name": "Sam", "age": 29 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        if expected == StatusCode::CONFLICT {
            assert_error_body(resp, expected, "PROFILE_EXISTS").await;
        } else {
            assert_eq!(resp.status(), expected);
        }
    }
}

#[actix_web::test]
async fn invalid_fields_are_rejected() {
    let app = create_test_app().await;
    for body in [
        json!({ "age": 30 }),
        json!({ "name": "S", "age": 30 }),
        json!({ "name": "Sam!", "age": 30 }),
        json!({ "name": "Sam", "age": 17 }),
        json!({ "name": "Sam", "age": 121 }),
        json!({ "name": "Sam", "age": 30, "bio": "x".repeat(501) }),
        json!({ "name": "Sam", "age": 30, "photos": ["not a url"] }),
        json!({ "name": "Sam", "age": 30, "photos": ["ftp://example.com/a.png"] }),
        json!({ "name": "Sam", "age": 30, "interests": [""] }),
        json!({ "name": "Sam", "age": 30, "interests": vec!["x"; 11] }),
    ] {
        let req = test::TestRequest::post()
            .uri("/profile")
            .insert_header((AUTHORIZATION, bearer_header("google_1")))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_error_body(resp, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    }
}

#[actix_web::test]
async fn others_can_read_but_not_modify() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/profile")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({ "name": "Sam", "age": 29 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/profile/google_1")
        .insert_header((AUTHORIZATION, bearer_header("apple_2")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["isOwnProfile"], false);
    assert_eq!(body["profile"]["name"], "Sam");

    let req = test::TestRequest::get()
        .uri("/profile/google_1")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["isOwnProfile"], true);

    let req = test::TestRequest::delete()
        .uri("/profile/google_1")
        .insert_header((AUTHORIZATION, bearer_header("apple_2")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_error_body(resp, StatusCode::FORBIDDEN, "FORBIDDEN").await;
    assert_eq!(body.error, "Forbidden: Cannot delete other users' profiles");

    let req = test::TestRequest::delete()
        .uri("/profile/google_1")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Profile deleted");

    let req = test::TestRequest::delete()
        .uri("/profile/google_1")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_body(resp, StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND").await;
}

#[actix_web::test]
async fn malformed_path_id_is_400() {
    let app = create_test_app().await;
    let req = test::TestRequest::get()
        .uri("/profile/not-a-user")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_error_body(resp, StatusCode::BAD_REQUEST, "INVALID_USER_ID").await;
    assert_eq!(body.error, "Invalid user ID format");
}

#[actix_web::test]
async fn discover_skips_self_and_blocked_users() {
    let app = create_test_app().await;
    for (user, name) in [("google_1", "Sam"), ("google_2", "Kim"), ("google_3", "Lee")] {
        let req = test::TestRequest::post()
            .uri("/profile")
            .insert_header((AUTHORIZATION, bearer_header(user)))
            .set_json(json!({ "name": name, "age": 30 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/blocks")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .set_json(json!({ "userId": "google_1", "blockedUserId": "google_3" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/profiles/discover")
        .insert_header((AUTHORIZATION, bearer_header("google_1")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["profiles"][0]["userId"], "google_2");
}
