//! Error types for telemetry collection.

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Result type alias for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Result type alias for external command invocations.
pub type CommandResult<T> = Result<T, CommandError>;

/// Failure to run an external program.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The program exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        /// Program name.
        program: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The program did not finish in time.
    #[error("'{program}' timed out after {timeout:?}")]
    Timeout {
        /// Program name.
        program: String,
        /// Configured limit.
        timeout: Duration,
    },
}

/// Errors raised while serving a telemetry request.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// `speedtest-cli` could not be run.
    #[error("speed test failed: {0}")]
    SpeedTest(#[source] CommandError),

    /// `speedtest-cli` output was not the expected JSON.
    #[error("failed to parse speed test output: {0}")]
    SpeedTestParse(#[source] serde_json::Error),

    /// `acpi` could not be run.
    #[error("battery query failed: {0}")]
    Battery(#[source] CommandError),

    /// `acpi` output carried no percentage.
    #[error("no battery percentage in output: {0:?}")]
    BatteryParse(String),

    /// The process table could not be listed.
    #[error("process listing failed: {0}")]
    Processes(#[source] CommandError),

    /// The container runtime returned an error.
    #[error("container runtime error: {0}")]
    Containers(String),

    /// The external IP lookup failed.
    #[error("external IP lookup failed: {0}")]
    IpLookup(String),

    /// No filesystem is mounted at the requested path.
    #[error("no disk mounted at '{0}'")]
    DiskNotFound(String),

    /// A blocking system query did not complete.
    #[error("system query failed: {0}")]
    Task(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TelemetryError {
    /// Message returned to HTTP clients for this error.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::SpeedTest(_) => "Failed to perform speed test",
            Self::SpeedTestParse(_) => "Failed to parse speed test result",
            Self::Battery(_) | Self::BatteryParse(_) => "Failed to get battery percentage",
            Self::Containers(_) => "Failed to get active containers",
            Self::IpLookup(_) => "Error fetching IP addresses",
            Self::DiskNotFound(_) => "Failed to get disk usage",
            Self::Processes(_) | Self::Task(_) | Self::Config(_) => "Internal Server Error",
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for TelemetryError {
    fn into_response(self) -> Response {
        error!(error = %self, "telemetry request failed");

        let message = self.public_message();
        match self {
            Self::IpLookup(_) => (StatusCode::INTERNAL_SERVER_ERROR, message).into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { error: message }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use test_case::test_case;

    async fn body_of(err: TelemetryError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn timeout() -> CommandError {
        CommandError::Timeout {
            program: "acpi".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test_case(TelemetryError::Battery(timeout()), "Failed to get battery percentage" ; "battery invocation")]
    #[test_case(TelemetryError::BatteryParse("AC adapter".into()), "Failed to get battery percentage" ; "battery parse")]
    #[test_case(TelemetryError::SpeedTest(timeout()), "Failed to perform speed test" ; "speedtest invocation")]
    #[test_case(TelemetryError::Processes(timeout()), "Internal Server Error" ; "processes")]
    #[test_case(TelemetryError::Containers("socket".into()), "Failed to get active containers" ; "containers")]
    #[test_case(TelemetryError::DiskNotFound("/".into()), "Failed to get disk usage" ; "disk")]
    fn test_public_message(err: TelemetryError, expected: &str) {
        assert_eq!(err.public_message(), expected);
    }

    #[tokio::test]
    async fn test_json_error_body() {
        let (status, body) = body_of(TelemetryError::Battery(timeout())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Failed to get battery percentage");
    }

    #[tokio::test]
    async fn test_speedtest_parse_body() {
        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let (_, body) = body_of(TelemetryError::SpeedTestParse(source)).await;
        assert_eq!(body, r#"{"error":"Failed to parse speed test result"}"#);
    }

    #[tokio::test]
    async fn test_ip_lookup_is_plain_text() {
        let (status, body) = body_of(TelemetryError::IpLookup("timeout".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error fetching IP addresses");
    }

    #[test]
    fn test_command_error_display() {
        let err = CommandError::Failed {
            program: "ps".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "'ps' exited with exit status: 1: boom");
        assert_eq!(timeout().to_string(), "'acpi' timed out after 1s");
    }
}
