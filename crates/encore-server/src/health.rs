use axum::response::IntoResponse;
use http::StatusCode;

/// Body of `GET /`
pub const LIVENESS_MESSAGE: &str = "Encore relay is running";

/// Root liveness handler
pub async fn liveness_handler() -> &'static str {
    LIVENESS_MESSAGE
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
