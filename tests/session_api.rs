#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Duration;
use serde_json::Value;
use survey_workflow::store::SessionStore;

use common::{bearer, CannedGenerator};

#[actix_web::test]
async fn login_lands_each_role_on_its_default_view() {
    let app = test_app!(CannedGenerator::new("unused"));

    for (role, view, menu_len) in [("Teacher", "grading", 4), ("Student", "tasks", 5), ("Admin", "users", 2)] {
        let req = test::TestRequest::post()
            .uri("/api/session/login")
            .set_json(serde_json::json!({ "name": "Someone", "role": role }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["session"]["default_view"], view);
        assert_eq!(body["data"]["session"]["session"]["role"], role);
        assert_eq!(
            body["data"]["session"]["menu"].as_array().map(Vec::len),
            Some(menu_len)
        );
    }
}

#[actix_web::test]
async fn blank_name_is_rejected() {
    let app = test_app!(CannedGenerator::new("unused"));

    let req = test::TestRequest::post()
        .uri("/api/session/login")
        .set_json(serde_json::json!({ "name": "   ", "role": "Student" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn logout_discards_the_session() {
    let app = test_app!(CannedGenerator::new("unused"));
    let token = login!(app, "Li Hua", "Student");

    let req = test::TestRequest::get()
        .uri("/api/session/me")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["session"]["name"], "Li Hua");

    let req = test::TestRequest::post()
        .uri("/api/session/logout")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/student/tasks")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn requests_without_a_token_are_unauthorized() {
    let app = test_app!(CannedGenerator::new("unused"));

    let req = test::TestRequest::get().uri("/api/session/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");

    // Authentication is checked before the body
    let req = test::TestRequest::post()
        .uri("/api/admin/users")
        .set_json(serde_json::json!({ "name": "Zhao Min", "email": "not-an-email" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/student/format-check")
        .set_json(serde_json::json!({ "text": "" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn views_of_another_role_are_forbidden() {
    let app = test_app!(CannedGenerator::new("unused"));
    let student = login!(app, "Li Hua", "Student");
    let teacher = login!(app, "Prof. Zhang", "Teacher");

    let req = test::TestRequest::get()
        .uri("/api/admin/users")
        .insert_header(bearer(&student))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/student/tasks")
        .insert_header(bearer(&teacher))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn health_reports_live_sessions() {
    let app = test_app!(CannedGenerator::new("unused"));
    login!(app, "Li Hua", "Student");

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["sessions"]["students"], 1);
    assert_eq!(body["data"]["sessions"]["total"], 1);
}

#[actix_web::test]
async fn login_is_refused_while_the_store_is_full() {
    let store = SessionStore::with_limits(Duration::hours(1), 2);
    let app = test_app!(CannedGenerator::new("unused"), store);
    let first = login!(app, "Li Hua", "Student");
    login!(app, "Wang Qiang", "Student");

    let req = test::TestRequest::post()
        .uri("/api/session/login")
        .set_json(serde_json::json!({ "name": "Zhao Min", "role": "Student" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let req = test::TestRequest::post()
        .uri("/api/session/logout")
        .insert_header(bearer(&first))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    login!(app, "Zhao Min", "Student");
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["sessions"]["total"], 2);
}
