pub mod config;
pub mod health;
pub mod view;

use serde::Serialize;

pub const EXIT_OK: u8 = 0;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_VIEW_ERROR: u8 = 3;
pub const EXIT_UNHEALTHY: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    /// Result whose output was already written while the command ran.
    pub fn streamed(exit_code: u8) -> Self {
        Self { exit_code, output: String::new() }
    }

    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: EXIT_OK, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::{CommandResult, EXIT_UNHEALTHY};

    #[test]
    fn failure_payload_carries_error_class() {
        let result = CommandResult::failure("health", "unreachable", "connection refused", 4);

        let payload: Value = serde_json::from_str(&result.output).expect("json output");
        assert_eq!(result.exit_code, EXIT_UNHEALTHY);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "unreachable");
        assert_eq!(payload["message"], "connection refused");
    }

    #[test]
    fn success_payload_has_no_error_class() {
        let result = CommandResult::success("health", "ok");

        let payload: Value = serde_json::from_str(&result.output).expect("json output");
        assert_eq!(result.exit_code, 0);
        assert!(payload["error_class"].is_null());
    }
}
