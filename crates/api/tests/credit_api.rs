//! End-to-end tests driving the router with in-memory stores.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use creditline_api::app::{build_app, services::CreditService};
use creditline_core::{LoanOrder, OrderId, OrderStatus, Tariff, TariffId, UserId};
use creditline_lending::AdmissionEngine;
use creditline_storage::{InMemoryOrderStore, InMemoryTariffStore, OrderStore};

fn test_app() -> (Router, Arc<InMemoryOrderStore>) {
    let tariffs = Arc::new(InMemoryTariffStore::seeded(vec![
        Tariff {
            id: TariffId::new(5),
            name: "consumer".to_string(),
            interest_rate: 14.9,
            term_months: 12,
        },
        Tariff {
            id: TariffId::new(6),
            name: "car".to_string(),
            interest_rate: 11.1,
            term_months: 60,
        },
    ]));
    let orders = Arc::new(InMemoryOrderStore::new());
    let service = Arc::new(CreditService::new(
        tariffs,
        orders.clone(),
        AdmissionEngine::with_defaults(),
    ));
    (build_app(service), orders)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn created_order_id(body: &Value) -> String {
    body["data"]["orderId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let (app, _) = test_app();
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn tariff_listing_is_wrapped_in_the_data_envelope() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/getTariffs", None).await;

    assert_eq!(status, StatusCode::OK);
    let tariffs = body["data"]["tariffs"].as_array().unwrap();
    assert_eq!(tariffs.len(), 2);
    assert_eq!(tariffs[0]["id"], 5);
    assert_eq!(tariffs[0]["name"], "consumer");
}

#[tokio::test]
async fn order_creation_returns_the_minted_id() {
    let (app, orders) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/order",
        Some(json!({"userId": 1, "tariffId": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let order_id: OrderId = created_order_id(&body).parse().unwrap();
    let stored = orders.get_order(order_id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::InProgress);
    assert!(stored.credit_rating > 0.09 && stored.credit_rating <= 0.9);
}

#[tokio::test]
async fn unknown_tariff_is_a_client_error() {
    let (app, orders) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/order",
        Some(json!({"userId": 1, "tariffId": 42})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "TARIFF_NOT_FOUND");
    assert!(orders.list_by_user(UserId::new(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn user_orders_listing_shows_created_orders() {
    let (app, _) = test_app();
    send(&app, "POST", "/order", Some(json!({"userId": 1, "tariffId": 5}))).await;
    send(&app, "POST", "/order", Some(json!({"userId": 1, "tariffId": 6}))).await;
    send(&app, "POST", "/order", Some(json!({"userId": 2, "tariffId": 5}))).await;

    let (status, body) = send(&app, "POST", "/getUserOrders", Some(json!(1))).await;

    assert_eq!(status, StatusCode::OK);
    let orders = body["data"]["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["userId"], 1);
    assert_eq!(orders[0]["status"], "IN_PROGRESS");
}

#[tokio::test]
async fn status_endpoint_reports_current_status_or_not_found() {
    let (app, _) = test_app();
    let (_, body) = send(
        &app,
        "POST",
        "/order",
        Some(json!({"userId": 1, "tariffId": 5})),
    )
    .await;
    let order_id = created_order_id(&body);

    let (status, body) = send(&app, "GET", &format!("/getStatusOrder?orderId={order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orderStatus"], "IN_PROGRESS");

    let unknown = OrderId::random();
    let (status, body) = send(&app, "GET", &format!("/getStatusOrder?orderId={unknown}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ORDER_NOT_FOUND");

    let (status, body) = send(&app, "GET", "/getStatusOrder?orderId=not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn delete_requires_a_matching_user_and_order_pair() {
    let (app, orders) = test_app();
    let (_, body) = send(
        &app,
        "POST",
        "/order",
        Some(json!({"userId": 1, "tariffId": 5})),
    )
    .await;
    let order_id = created_order_id(&body);

    let (status, body) = send(
        &app,
        "DELETE",
        "/deleteOrder",
        Some(json!({"userId": 2, "orderId": order_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ORDER_IMPOSSIBLE_TO_DELETE");
    assert!(orders
        .order_exists(order_id.parse().unwrap())
        .await
        .unwrap());

    let (status, body) = send(
        &app,
        "DELETE",
        "/deleteOrder",
        Some(json!({"userId": 1, "orderId": order_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", &format!("/getStatusOrder?orderId={order_id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ORDER_NOT_FOUND");
}

#[tokio::test]
async fn admission_lifecycle_walkthrough() {
    let (app, orders) = test_app();

    // Fresh user, tariff 5: admitted.
    let (status, body) = send(
        &app,
        "POST",
        "/order",
        Some(json!({"userId": 1, "tariffId": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let first_id: OrderId = created_order_id(&body).parse().unwrap();

    // Immediate re-application for the same tariff: pending order blocks.
    let (status, body) = send(
        &app,
        "POST",
        "/order",
        Some(json!({"userId": 1, "tariffId": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "LOAN_CONSIDERATION");

    // The decision process refuses the order; cooldown starts now.
    orders
        .update_status(OrderStatus::Refused, UserId::new(1), first_id)
        .await
        .unwrap();
    let (status, body) = send(
        &app,
        "POST",
        "/order",
        Some(json!({"userId": 1, "tariffId": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "TRY_LATER");

    // Replace the refusal with one whose cooldown has elapsed.
    orders.delete_order(UserId::new(1), first_id).await.unwrap();
    let refused_at = Utc::now() - Duration::seconds(121);
    let cooled = LoanOrder {
        order_id: OrderId::random(),
        user_id: UserId::new(1),
        tariff_id: TariffId::new(5),
        credit_rating: 0.5,
        status: OrderStatus::Refused,
        time_insert: refused_at,
        time_update: refused_at,
    };
    orders.insert_order(&cooled).await.unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/order",
        Some(json!({"userId": 1, "tariffId": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_id: OrderId = created_order_id(&body).parse().unwrap();
    assert_ne!(new_id, cooled.order_id);
    assert_ne!(new_id, first_id);
}

#[tokio::test]
async fn approved_loan_blocks_reapplication() {
    let (app, orders) = test_app();
    let (_, body) = send(
        &app,
        "POST",
        "/order",
        Some(json!({"userId": 1, "tariffId": 5})),
    )
    .await;
    let order_id: OrderId = created_order_id(&body).parse().unwrap();

    orders
        .update_status(OrderStatus::Approved, UserId::new(1), order_id)
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/order",
        Some(json!({"userId": 1, "tariffId": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "LOAN_ALREADY_APPROVED");
}
