pub mod app;
pub mod bootstrap;
pub mod error;
pub mod health;
pub mod products;
pub mod request_context;
pub mod state;

pub use app::{create_app, serve};
pub use bootstrap::{bootstrap, bootstrap_with_config, Application, BootstrapError};
pub use state::AppState;
