use std::time::Duration;

use anyhow::Result;
use catalog_core::config::{AppConfig, LoadOptions};
use catalog_core::PRODUCTS_PATH;
use catalog_server::{bootstrap_with_config, create_app, serve};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &AppConfig) {
    use catalog_core::config::LogFormat::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.trim().to_ascii_lowercase()));

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap_with_config(config).await?;
    let base_url = app.base_url()?;
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        url = %base_url,
        "Server running on {base_url}"
    );
    tracing::info!(
        event_name = "system.server.products_endpoint",
        correlation_id = "bootstrap",
        "Products API available at {base_url}{PRODUCTS_PATH}"
    );

    serve(app.listener, create_app(app.state), wait_for_shutdown(), grace).await?;

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "catalog-server stopped"
    );
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "could not listen for ctrl-c, running until the process is killed"
        );
        std::future::pending::<()>().await;
    }
}
