use axum::{http::StatusCode, Json};
use catalog_core::HealthStatus;

/// Liveness only: answers as long as the process is serving requests.
pub async fn health() -> (StatusCode, Json<HealthStatus>) {
    (StatusCode::OK, Json(HealthStatus::ok()))
}
