pub mod config;
pub mod domain;
pub mod errors;
pub mod view;
pub mod wire;

pub use domain::catalog::{Catalog, CatalogSummary};
pub use domain::money::{format_amount, format_price};
pub use domain::product::{Product, ProductId};
pub use errors::DomainError;
pub use view::{ViewEvent, ViewState, ViewStatus, ViewTransitionError, FETCH_REJECTED_MESSAGE};
pub use wire::{ApiEnvelope, HealthStatus, HEALTH_OK, HEALTH_PATH, PRODUCTS_PATH};
