use std::env;
use std::fs;
use std::path::Path;

use catalog_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG, EXIT_OK};

/// One reported setting and every place its value could have come from.
struct Field<'a> {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
    flag: Option<&'a str>,
}

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let base_url_flag = options.overrides.client_base_url.is_some().then_some("--base-url");

    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult {
                exit_code: EXIT_CONFIG,
                output: format!("config validation failed: {error}"),
            }
        }
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = [
        Field {
            key: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["CATALOG_SERVER_BIND_ADDRESS"],
            flag: None,
        },
        Field {
            key: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["CATALOG_SERVER_PORT", "PORT"],
            flag: None,
        },
        Field {
            key: "server.products_delay_ms",
            value: config.server.products_delay_ms.to_string(),
            env_keys: &["CATALOG_SERVER_PRODUCTS_DELAY_MS"],
            flag: None,
        },
        Field {
            key: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["CATALOG_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            flag: None,
        },
        Field {
            key: "client.base_url",
            value: config.client.base_url.clone(),
            env_keys: &["CATALOG_CLIENT_BASE_URL"],
            flag: base_url_flag,
        },
        Field {
            key: "client.timeout_secs",
            value: config
                .client
                .timeout_secs
                .map(|secs| secs.to_string())
                .unwrap_or_else(|| "<unset>".to_string()),
            env_keys: &["CATALOG_CLIENT_TIMEOUT_SECS"],
            flag: None,
        },
        Field {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["CATALOG_LOGGING_LEVEL", "CATALOG_LOG_LEVEL"],
            flag: None,
        },
        Field {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_lowercase(),
            env_keys: &["CATALOG_LOGGING_FORMAT", "CATALOG_LOG_FORMAT"],
            flag: None,
        },
    ];

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    for field in &fields {
        let source = field_source(field, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(field.key, &field.value, source));
    }

    CommandResult { exit_code: EXIT_OK, output: lines.join("\n") }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &Field<'_>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(flag) = field.flag {
        return format!("flag ({flag})");
    }

    for env_key in field.env_keys {
        if env::var(env_key).is_ok_and(|value| !value.trim().is_empty()) {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
