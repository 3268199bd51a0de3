use actix_web::{test, App};
use backend::routes;
use serde_json::Value;

use crate::support::app_builder::memory_state;

#[actix_web::test]
async fn health_reports_the_memory_store() {
    let state = memory_state().await;
    let app = test::init_service(App::new().app_data(state).configure(routes::configure)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["db"], "none");
    assert!(body["app_version"].is_string());
    assert!(body["time"].is_string());
}
