//! JSON shapes shared by the catalog service and its clients.
//!
//! Success: `{"success":true,"data":...}`.
//! Failure: non-2xx status with `{"success":false,"message":"..."}`.

use serde::{Deserialize, Serialize};

pub const PRODUCTS_PATH: &str = "/api/products";
pub const HEALTH_PATH: &str = "/health";
pub const HEALTH_OK: &str = "OK";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self { status: HEALTH_OK.to_string() }
    }

    pub fn is_ok(&self) -> bool {
        self.status == HEALTH_OK
    }
}
