use std::sync::Arc;
use std::time::Duration;

use catalog_core::config::ServerConfig;
use catalog_core::Catalog;

/// Shared handler state. The catalog is read-only, so clones share it without locking.
#[derive(Clone, Debug)]
pub struct AppState {
    catalog: Arc<Catalog>,
    products_delay: Duration,
}

impl AppState {
    pub fn new(catalog: Catalog, products_delay: Duration) -> Self {
        Self { catalog: Arc::new(catalog), products_delay }
    }

    pub fn from_config(catalog: Catalog, config: &ServerConfig) -> Self {
        Self::new(catalog, Duration::from_millis(config.products_delay_ms))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn products_delay(&self) -> Duration {
        self.products_delay
    }
}
