use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use creditline_core::{OrderId, TariffId, UserId};

use crate::app::services::CreditService;
use crate::app::{dto, errors};

pub async fn get_tariffs(
    Extension(services): Extension<Arc<CreditService>>,
) -> axum::response::Response {
    match services.get_tariffs().await {
        Ok(tariffs) => {
            let items = tariffs.into_iter().map(dto::tariff_to_json).collect::<Vec<_>>();
            (
                StatusCode::OK,
                Json(dto::data(serde_json::json!({ "tariffs": items }))),
            )
                .into_response()
        }
        Err(e) => errors::credit_error_to_response(e),
    }
}

pub async fn get_user_orders(
    Extension(services): Extension<Arc<CreditService>>,
    Json(user_id): Json<i64>,
) -> axum::response::Response {
    match services.get_user_orders(UserId::new(user_id)).await {
        Ok(orders) => {
            let items = orders
                .into_iter()
                .map(dto::loan_order_to_json)
                .collect::<Vec<_>>();
            (
                StatusCode::OK,
                Json(dto::data(serde_json::json!({ "orders": items }))),
            )
                .into_response()
        }
        Err(e) => errors::credit_error_to_response(e),
    }
}

pub async fn create_order(
    Extension(services): Extension<Arc<CreditService>>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    match services
        .create_order(UserId::new(body.user_id), TariffId::new(body.tariff_id))
        .await
    {
        Ok(order) => (
            StatusCode::OK,
            Json(dto::data(
                serde_json::json!({ "orderId": order.order_id.to_string() }),
            )),
        )
            .into_response(),
        Err(e) => errors::credit_error_to_response(e),
    }
}

pub async fn get_status_order(
    Extension(services): Extension<Arc<CreditService>>,
    Query(query): Query<dto::StatusQuery>,
) -> axum::response::Response {
    let order_id: OrderId = match query.order_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
        }
    };

    match services.get_order_status(order_id).await {
        Ok(order) => (
            StatusCode::OK,
            Json(dto::data(
                serde_json::json!({ "orderStatus": order.status.as_str() }),
            )),
        )
            .into_response(),
        Err(e) => errors::credit_error_to_response(e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<CreditService>>,
    Json(body): Json<dto::DeleteOrderRequest>,
) -> axum::response::Response {
    let order_id: OrderId = match body.order_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
        }
    };

    match services
        .delete_order(UserId::new(body.user_id), order_id)
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::credit_error_to_response(e),
    }
}
