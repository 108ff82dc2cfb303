//! Where the client gets its catalog from.

use std::time::Duration;

use async_trait::async_trait;
use catalog_core::config::ClientConfig;
use catalog_core::{ApiEnvelope, HealthStatus, Product, HEALTH_PATH, PRODUCTS_PATH};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub type ProductsEnvelope = ApiEnvelope<Vec<Product>>;

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self) -> Result<ProductsEnvelope, FetchError>;

    /// Human-readable location of the service, used in connectivity hints.
    fn endpoint(&self) -> &str;
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{message}")]
    Transport { message: String },
    #[error("Request failed with status code {status}")]
    Status { status: u16, server_message: Option<String> },
    #[error("invalid response body: {message}")]
    Decode { message: String },
}

impl FetchError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { server_message: Some(message), .. } if !message.trim().is_empty() => {
                Some(message)
            }
            _ => None,
        }
    }

    /// Collapses the failure into the single string shown to the user:
    /// the server's own message, else the transport message, else a hint to
    /// check that the service is reachable.
    pub fn user_message(&self, endpoint: &str) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }

        let transport = self.to_string();
        if !transport.trim().is_empty() {
            return transport;
        }

        unreachable_hint(endpoint)
    }
}

pub fn unreachable_hint(endpoint: &str) -> String {
    format!(
        "An error occurred while fetching products. Make sure the server is running on {endpoint}"
    )
}

#[derive(Clone, Debug)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogSource {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport_error)?;
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        Self::new(config.base_url.clone(), config.timeout_secs.map(Duration::from_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_health(&self) -> Result<HealthStatus, FetchError> {
        self.get_json(HEALTH_PATH).await
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let server_message = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message);
            return Err(FetchError::Status { status: status.as_u16(), server_message });
        }

        serde_json::from_slice(&body).map_err(|error| FetchError::Decode { message: error.to_string() })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_products(&self) -> Result<ProductsEnvelope, FetchError> {
        self.get_json(PRODUCTS_PATH).await
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

fn transport_error(error: reqwest::Error) -> FetchError {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }

    FetchError::Transport { message }
}
