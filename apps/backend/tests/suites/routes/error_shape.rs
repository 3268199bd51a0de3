use actix_web::{test, App};
use backend::middleware::request_trace::RequestTrace;
use backend::routes;
use serde_json::json;

use crate::common::assert_problem;
use crate::support::app_builder::{get_as, post_as, memory_state};

#[actix_web::test]
async fn missing_bearer_is_401() {
    let state = memory_state().await;
    let app = test::init_service(App::new().app_data(state).configure(routes::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/rooms")
        .set_json(json!({ "settings_choice": "A" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;
}

#[actix_web::test]
async fn garbage_token_is_401_invalid_jwt() {
    let state = memory_state().await;
    let app = test::init_service(App::new().app_data(state).configure(routes::configure)).await;

    let req = test::TestRequest::get()
        .uri("/api/rooms/some-room/snapshot")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 401, "UNAUTHORIZED_INVALID_JWT").await;
}

#[actix_web::test]
async fn malformed_body_is_400_invalid_input() {
    let state = memory_state().await;
    let app = test::init_service(App::new().app_data(state).configure(routes::configure)).await;

    let resp = test::call_service(
        &app,
        post_as(1, "/api/rooms", json!({ "settings": "A" })).to_request(),
    )
    .await;
    assert_problem(resp, 400, "INVALID_INPUT").await;
}

#[actix_web::test]
async fn unknown_room_is_404() {
    let state = memory_state().await;
    let app = test::init_service(App::new().app_data(state).configure(routes::configure)).await;

    let resp = test::call_service(&app, get_as(1, "/api/rooms/nope/snapshot").to_request()).await;
    let body = assert_problem(resp, 404, "ROOM_NOT_FOUND").await;
    assert_eq!(body["title"], "Room Not Found");
}

#[actix_web::test]
async fn request_trace_sets_a_trace_id_shared_with_the_body() {
    let state = memory_state().await;
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(state)
            .configure(routes::configure),
    )
    .await;

    let resp = test::call_service(&app, get_as(1, "/api/rooms/nope/audit").to_request()).await;
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_ne!(trace_id, "unknown");
    let body = assert_problem(resp, 404, "ROOM_NOT_FOUND").await;
    assert_eq!(body["trace_id"], trace_id.as_str());
}
