use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::ApiEnvelope;
use thiserror::Error;

/// Errors surfaced to HTTP callers as `{"success":false,"message":...}` with a
/// non-2xx status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no route for {path}")]
    RouteNotFound { path: String },
    #[error("method {method} is not allowed for {path}")]
    MethodNotAllowed { method: Method, path: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ApiEnvelope::<()>::failure(self.to_string()))).into_response()
    }
}

pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound { path: uri.path().to_string() }
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed { method, path: uri.path().to_string() }
}

#[cfg(test)]
mod tests {
    use axum::{
        http::{Method, StatusCode},
        response::IntoResponse,
    };

    use crate::error::ApiError;

    #[tokio::test]
    async fn route_not_found_uses_failure_envelope() {
        let response =
            ApiError::RouteNotFound { path: "/api/orders".to_string() }.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(
            payload,
            serde_json::json!({ "success": false, "message": "no route for /api/orders" })
        );
    }

    #[test]
    fn method_not_allowed_maps_to_405() {
        let error =
            ApiError::MethodNotAllowed { method: Method::DELETE, path: "/health".to_string() };

        assert_eq!(error.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(error.to_string(), "method DELETE is not allowed for /health");
    }
}
