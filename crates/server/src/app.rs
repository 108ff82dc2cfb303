//! Router assembly and the serve loop for the catalog service.
//!
//! Endpoints:
//! - `GET /api/products`: full catalog after the artificial delay
//! - `GET /health`: liveness probe
//!
//! Unknown paths answer 404 and wrong methods 405, both with the failure
//! envelope.

use std::future::Future;
use std::io;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use catalog_core::{HEALTH_PATH, PRODUCTS_PATH};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{error, health, products, request_context, state::AppState};

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route(HEALTH_PATH, get(health::health))
        .route(PRODUCTS_PATH, get(products::list_products))
        .fallback(error::route_not_found)
        .method_not_allowed_fallback(error::method_not_allowed)
        .layer(middleware::from_fn(request_context::request_context))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves `router` until `shutdown` resolves, then stops accepting connections
/// and gives in-flight requests up to `grace` to finish.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    grace: Duration,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.changed().await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => return flatten(joined),
        () = shutdown => {}
    }

    info!(
        event_name = "system.server.draining",
        correlation_id = "shutdown",
        grace_secs = grace.as_secs(),
        "shutdown requested, draining in-flight requests"
    );
    let _ = stop_tx.send(true);

    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => flatten(joined),
        Err(_) => {
            warn!(
                event_name = "system.server.drain_timeout",
                correlation_id = "shutdown",
                "graceful shutdown window elapsed, aborting remaining requests"
            );
            server.abort();
            Ok(())
        }
    }
}

fn flatten(joined: Result<io::Result<()>, JoinError>) -> io::Result<()> {
    joined.map_err(|error| io::Error::new(io::ErrorKind::Other, error))?
}
