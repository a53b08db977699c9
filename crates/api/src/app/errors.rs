use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use creditline_core::CreditError;

/// Map a credit failure to its HTTP response.
///
/// Business-rule failures are client errors (400) carrying the
/// machine-readable code; storage faults surface as a generic 500 without
/// internal detail.
pub fn credit_error_to_response(err: CreditError) -> axum::response::Response {
    match err {
        CreditError::Storage(detail) => {
            tracing::error!(%detail, "storage failure while serving request");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "internal storage failure",
            )
        }
        other => json_error(StatusCode::BAD_REQUEST, other.code(), other.to_string()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
