use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

pub fn router() -> Router {
    Router::new().route("/health", get(health_probe))
}

/// Liveness probe for deploy checks and uptime monitors.
async fn health_probe() -> StatusCode {
    StatusCode::OK
}
