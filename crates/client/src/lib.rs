pub mod commands;
pub mod render;
pub mod session;
pub mod source;

use std::path::PathBuf;
use std::process::ExitCode;

use catalog_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

pub use render::{CatalogRenderer, OutputFormat, RenderError};
pub use session::{CatalogSession, LoadOutcome};
pub use source::{CatalogSource, FetchError, HttpCatalogSource};

#[derive(Debug, Parser)]
#[command(
    name = "catalog-view",
    about = "Product catalog terminal client",
    long_about = "Fetch the product catalog from a running catalog service and display it, with retry on failure.",
    after_help = "Examples:\n  catalog-view\n  catalog-view --base-url http://localhost:5000 view --format html\n  catalog-view health --json\n  catalog-view config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a catalog.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Catalog service base URL, overriding config and env")]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => Self::Text,
            FormatArg::Html => Self::Html,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Fetch and display the catalog (default)")]
    View {
        #[arg(long, value_enum, default_value_t = FormatArg::Text, help = "Output format")]
        format: FormatArg,
        #[arg(long, help = "Exit on the first failure instead of prompting to retry")]
        no_retry: bool,
    },
    #[command(about = "Check that the catalog service answers its health probe")]
    Health {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                client_base_url: self.base_url.clone(),
                ..ConfigOverrides::default()
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();
    let command =
        cli.command.unwrap_or(Command::View { format: FormatArg::Text, no_retry: false });

    let result = match command {
        Command::Config => commands::config::run(options),
        Command::View { format, no_retry } => {
            with_config(options, |config| commands::view::run(config, format.into(), !no_retry))
        }
        Command::Health { json } => {
            with_config(options, |config| commands::health::run(config, json))
        }
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}

fn with_config(
    options: LoadOptions,
    command: impl FnOnce(&AppConfig) -> commands::CommandResult,
) -> commands::CommandResult {
    match AppConfig::load(options) {
        Ok(config) => {
            init_logging(&config);
            command(&config)
        }
        Err(error) => commands::CommandResult::failure(
            "startup",
            "config_validation",
            error.to_string(),
            commands::EXIT_CONFIG,
        ),
    }
}

/// Diagnostics go to stderr so stdout carries only the rendered catalog.
fn init_logging(config: &AppConfig) {
    use catalog_core::config::LogFormat::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.trim().to_ascii_lowercase()));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    // A subscriber may already be installed when embedded in tests.
    let _ = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
}
