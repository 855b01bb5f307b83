use accounting_client::AccountingApiError;
use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use chrono::DateTime;
use serde_json::{json, Value};

use super::{
    helpers::{get_request, post_request},
    mocks::MockForwarder,
};
use crate::{config::ServerOptions, routes::health, server::json_config, webhook_routes::OrderWebhookRoute};

const VALID_ORDER: &str = r#"{
    "payment": {
        "amount": 11,
        "orderid": "ORD-1",
        "products": [
            {"name": "A", "quantity": 2, "price": 3, "amount": 6},
            {"name": "B", "quantity": 1, "price": 5, "amount": 5, "options": [{"option": "Color", "variant": "Red"}]}
        ]
    },
    "ma_email": "jane@example.com"
}"#;

#[actix_web::test]
async fn health_check_returns_a_parseable_timestamp() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/webhook", configure_health).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "ok");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[actix_web::test]
async fn probe_is_acknowledged_without_forwarding() {
    let _ = env_logger::try_init().ok();
    let probe = r#"{"test": "test", "payment": {"amount": 5, "orderid": "ORD-9",
        "products": [{"name": "A", "quantity": 1, "price": 5, "amount": 5}]}, "ma_email": "a@b.c"}"#;
    let (status, body) = post_request("/webhook", probe, configure_no_forwarding).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "test");
    assert_eq!(body["message"], "Test data received successfully");
}

#[actix_web::test]
async fn schema_violations_are_itemized() {
    let _ = env_logger::try_init().ok();
    let invalid = r#"{"payment": {"orderid": "ORD-2",
        "products": [{"name": "A", "quantity": -1, "price": 3, "amount": 6}]}, "ma_email": "nope"}"#;
    let (status, body) = post_request("/webhook", invalid, configure_no_forwarding).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Invalid request data");
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert!(details[0].as_str().unwrap().contains("quantity"));
    assert!(details[1].as_str().unwrap().contains("ma_email"));
}

#[actix_web::test]
async fn missing_order_id_is_rejected_before_forwarding() {
    let _ = env_logger::try_init().ok();
    let no_id = r#"{"payment": {"amount": 6, "products": [{"name": "A", "quantity": 2, "price": 3, "amount": 6}]}}"#;
    let empty_id = r#"{"payment": {"amount": 6, "orderid": ""}}"#;
    for body in [no_id, empty_id] {
        let (status, body) = post_request("/webhook", body, configure_no_forwarding).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error"], "Invalid order data");
        assert_eq!(body["message"], "Missing order ID");
    }
}

#[actix_web::test]
async fn forwarded_order_returns_the_api_response() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("/webhook", VALID_ORDER, configure_forward_success).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["orderId"], "ORD-1");
    assert_eq!(body["apiResponse"]["ledger_entry"], 4711);
    assert!(body["message"].as_str().is_some());
}

#[actix_web::test]
async fn forward_failure_is_a_generic_500() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("/webhook", VALID_ORDER, configure_forward_failure).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("upstream says no"));
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Internal server error");
    assert!(body.get("details").is_none());
}

#[actix_web::test]
async fn development_mode_exposes_downstream_detail() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("/webhook", VALID_ORDER, configure_forward_failure_development).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Internal server error");
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("502"));
}

// There is deliberately no deduplication: delivering the same payload twice must forward twice.
#[actix_web::test]
async fn identical_payloads_are_forwarded_twice() {
    let _ = env_logger::try_init().ok();
    let mut forwarder = MockForwarder::new();
    forwarder.expect_forward().times(2).returning(|_| Ok(json!("ack")));
    let app = App::new()
        .app_data(web::Data::new(forwarder))
        .app_data(web::Data::new(ServerOptions { development_mode: false }))
        .app_data(json_config())
        .service(OrderWebhookRoute::<MockForwarder>::new());
    let service = test::init_service(app).await;
    for _ in 0..2 {
        let req = TestRequest::post()
            .uri("/webhook")
            .insert_header(("Content-Type", "application/json"))
            .set_payload(VALID_ORDER.to_owned())
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn unparseable_body_is_a_400_with_details() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("/webhook", r#"{"payment": "not an object"}"#, configure_no_forwarding).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Invalid request data");
    assert!(!body["details"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn oversized_body_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = format!(r#"{{"padding": "{}"}}"#, "x".repeat(11 * 1024));
    let (status, body) = post_request("/webhook", &body, configure_no_forwarding).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Invalid request data");
}

//-------------------------------------------------  Service setups  ---------------------------------------------------

fn install(cfg: &mut ServiceConfig, forwarder: MockForwarder, development_mode: bool) {
    cfg.app_data(web::Data::new(forwarder))
        .app_data(web::Data::new(ServerOptions { development_mode }))
        .app_data(json_config())
        .service(OrderWebhookRoute::<MockForwarder>::new());
}

fn configure_health(cfg: &mut ServiceConfig) {
    cfg.service(health);
}

fn configure_no_forwarding(cfg: &mut ServiceConfig) {
    let mut forwarder = MockForwarder::new();
    forwarder.expect_forward().never();
    install(cfg, forwarder, false);
}

fn configure_forward_success(cfg: &mut ServiceConfig) {
    let mut forwarder = MockForwarder::new();
    forwarder
        .expect_forward()
        .times(1)
        .withf(|record| record.id == "ORD-1" && record.items == "A – 2x3=6;B (Color: Red) – 1x5=5;")
        .returning(|_| Ok(json!({"ledger_entry": 4711})));
    install(cfg, forwarder, false);
}

fn configure_forward_failure(cfg: &mut ServiceConfig) {
    let mut forwarder = MockForwarder::new();
    forwarder
        .expect_forward()
        .times(1)
        .returning(|_| Err(AccountingApiError::RemoteError { status: 502, message: "upstream says no".to_string() }));
    install(cfg, forwarder, false);
}

fn configure_forward_failure_development(cfg: &mut ServiceConfig) {
    let mut forwarder = MockForwarder::new();
    forwarder
        .expect_forward()
        .times(1)
        .returning(|_| Err(AccountingApiError::RemoteError { status: 502, message: "upstream says no".to_string() }));
    install(cfg, forwarder, true);
}
