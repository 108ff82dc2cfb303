use std::io;
use std::net::SocketAddr;

use catalog_core::config::{AppConfig, ConfigError, LoadOptions};
use catalog_core::{Catalog, DomainError};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::state::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
    pub listener: TcpListener,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog construction failed: {0}")]
    Catalog(#[source] DomainError),
    #[error("could not bind `{address}`: {source}")]
    Bind { address: String, source: io::Error },
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting catalog service bootstrap"
    );

    let catalog = Catalog::builtin().map_err(BootstrapError::Catalog)?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        product_count = catalog.len(),
        "catalog loaded"
    );

    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| BootstrapError::Bind { address: address.clone(), source })?;
    info!(
        event_name = "system.bootstrap.listener_bound",
        correlation_id = "bootstrap",
        bind_address = %address,
        "listener bound"
    );

    let state = AppState::from_config(catalog, &config.server);
    Ok(Application { config, state, listener })
}

impl Application {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn base_url(&self) -> io::Result<String> {
        Ok(format!("http://{}", self.local_addr()?))
    }
}
