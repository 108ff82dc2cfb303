use axum::{extract::State, Json};
use catalog_core::{ApiEnvelope, Product};
use tracing::debug;

use crate::state::AppState;

/// Lists the whole catalog after the configured artificial delay.
///
/// The delay suspends only this request; other requests keep being served.
pub async fn list_products(State(state): State<AppState>) -> Json<ApiEnvelope<Vec<Product>>> {
    let delay = state.products_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let products = state.catalog().products().to_vec();
    debug!(
        event_name = "catalog.products.listed",
        product_count = products.len(),
        delay_ms = delay.as_millis() as u64,
        "catalog listing served"
    );

    Json(ApiEnvelope::success(products))
}
