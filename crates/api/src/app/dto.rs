use serde::Deserialize;

use creditline_core::{LoanOrder, Tariff};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub tariff_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOrderRequest {
    pub user_id: i64,
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub order_id: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Uniform success envelope.
pub fn data(payload: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "data": payload })
}

pub fn tariff_to_json(tariff: Tariff) -> serde_json::Value {
    serde_json::json!({
        "id": tariff.id.value(),
        "name": tariff.name,
        "interestRate": tariff.interest_rate,
        "termMonths": tariff.term_months,
    })
}

pub fn loan_order_to_json(order: LoanOrder) -> serde_json::Value {
    serde_json::json!({
        "orderId": order.order_id.to_string(),
        "userId": order.user_id.value(),
        "tariffId": order.tariff_id.value(),
        "creditRating": order.credit_rating,
        "status": order.status.as_str(),
        "timeInsert": order.time_insert.to_rfc3339(),
        "timeUpdate": order.time_update.to_rfc3339(),
    })
}
