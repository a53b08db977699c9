use axum::{
    routing::{delete, get, post},
    Router,
};

pub mod credit;
pub mod system;

/// Router for all credit endpoints (original endpoint shapes).
pub fn router() -> Router {
    Router::new()
        .route("/getTariffs", get(credit::get_tariffs))
        .route("/getUserOrders", post(credit::get_user_orders))
        .route("/order", post(credit::create_order))
        .route("/getStatusOrder", get(credit::get_status_order))
        .route("/deleteOrder", delete(credit::delete_order))
}
