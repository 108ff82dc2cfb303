use catalog_core::config::AppConfig;
use catalog_core::HealthStatus;
use tracing::debug;

use crate::commands::{CommandResult, EXIT_OK, EXIT_UNHEALTHY};
use crate::source::{FetchError, HttpCatalogSource};

const COMMAND: &str = "health";

pub fn run(config: &AppConfig, json_output: bool) -> CommandResult {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime",
                format!("failed to build async runtime: {error}"),
                EXIT_UNHEALTHY,
            )
        }
    };

    let source = match HttpCatalogSource::from_config(&config.client) {
        Ok(source) => source,
        Err(error) => {
            return CommandResult::failure(COMMAND, "client", error.to_string(), EXIT_UNHEALTHY)
        }
    };

    debug!(event_name = "client.health.checking", base_url = %source.base_url(), "probing service");
    let result = runtime.block_on(source.fetch_health());
    report(source.base_url(), result, json_output)
}

pub fn report(
    base_url: &str,
    result: Result<HealthStatus, FetchError>,
    json_output: bool,
) -> CommandResult {
    let (healthy, error_class, message) = match result {
        Ok(status) if status.is_ok() => (true, None, format!("catalog service at {base_url} is healthy")),
        Ok(status) => (
            false,
            Some("unhealthy"),
            format!("catalog service at {base_url} reported status {:?}", status.status),
        ),
        Err(error) => (false, Some("unreachable"), error.user_message(base_url)),
    };

    if json_output {
        return match error_class {
            None => CommandResult::success(COMMAND, message),
            Some(class) => CommandResult::failure(COMMAND, class, message, EXIT_UNHEALTHY),
        };
    }

    if healthy {
        CommandResult { exit_code: EXIT_OK, output: format!("OK: {message}") }
    } else {
        CommandResult { exit_code: EXIT_UNHEALTHY, output: format!("FAIL: {message}") }
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::HealthStatus;
    use serde_json::Value;

    use super::report;
    use crate::source::FetchError;

    const BASE_URL: &str = "http://localhost:5000";

    #[test]
    fn healthy_service_exits_zero() {
        let result = report(BASE_URL, Ok(HealthStatus::ok()), false);

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.output, "OK: catalog service at http://localhost:5000 is healthy");
    }

    #[test]
    fn unexpected_status_is_unhealthy() {
        let status = HealthStatus { status: "DEGRADED".to_string() };

        let result = report(BASE_URL, Ok(status), false);

        assert_eq!(result.exit_code, 4);
        assert!(result.output.contains("\"DEGRADED\""));
    }

    #[test]
    fn unreachable_service_reports_json_failure() {
        let error = FetchError::Transport { message: "connection refused".to_string() };

        let result = report(BASE_URL, Err(error), true);

        let payload: Value = serde_json::from_str(&result.output).expect("json output");
        assert_eq!(result.exit_code, 4);
        assert_eq!(payload["command"], "health");
        assert_eq!(payload["error_class"], "unreachable");
        assert_eq!(payload["message"], "connection refused");
    }
}
