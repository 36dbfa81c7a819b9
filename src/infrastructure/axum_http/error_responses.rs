use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Builds the JSON error body for a failed request. Server-side failures
/// keep their detail in the logs, not in the response.
pub fn error_response(status: StatusCode, err: impl std::fmt::Display) -> Response {
    let message = if status.is_server_error() {
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(ErrorResponse {
            code: status.as_u16(),
            message,
        }),
    )
        .into_response()
}
