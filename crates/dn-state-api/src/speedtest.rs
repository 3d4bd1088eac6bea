//! Network speed via `speedtest-cli --json`.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::ExternalCommand;
use crate::error::{CommandError, CommandResult, TelemetryError, TelemetryResult};
use crate::format::{format_mbps, format_ping};

/// Formatted speed test result served on `/Speedtest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpeedTestReport {
    /// Download rate, e.g. `"93.41 Mbps"`.
    pub download: String,
    /// Upload rate, e.g. `"11.02 Mbps"`.
    pub upload: String,
    /// Round-trip latency, e.g. `"23.5 ms"`.
    pub ping: String,
}

/// Fields read from the `speedtest-cli` JSON document.
#[derive(Debug, Deserialize)]
struct RawSpeedTest {
    download: f64,
    upload: f64,
    ping: f64,
}

/// Source of raw speed test output.
pub trait SpeedTestProvider: Send + Sync {
    /// Run a speed test and return its JSON output.
    fn run_speedtest(&self) -> Pin<Box<dyn Future<Output = CommandResult<String>> + Send + '_>>;
}

/// Speed test provider backed by `speedtest-cli --json`.
#[derive(Debug, Clone)]
pub struct SpeedtestCli {
    command: ExternalCommand,
}

impl SpeedtestCli {
    /// Create a provider running `program --json`.
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: ExternalCommand::new(program, ["--json"], timeout),
        }
    }
}

impl SpeedTestProvider for SpeedtestCli {
    fn run_speedtest(&self) -> Pin<Box<dyn Future<Output = CommandResult<String>> + Send + '_>> {
        Box::pin(self.command.run())
    }
}

/// Parse `speedtest-cli --json` output into a formatted report.
///
/// `download` and `upload` are bits per second and `ping` is milliseconds.
///
/// # Errors
///
/// Returns [`TelemetryError::SpeedTestParse`] if the output is not valid JSON
/// or lacks a numeric field.
pub fn parse_speedtest(output: &str) -> TelemetryResult<SpeedTestReport> {
    let raw: RawSpeedTest = serde_json::from_str(output).map_err(TelemetryError::SpeedTestParse)?;

    Ok(SpeedTestReport {
        download: format_mbps(raw.download),
        upload: format_mbps(raw.upload),
        ping: format_ping(raw.ping),
    })
}

/// Fake speed test provider for tests.
#[derive(Debug, Clone)]
pub struct FakeSpeedTest {
    output: Option<String>,
}

impl FakeSpeedTest {
    /// A provider that prints `output`.
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
        }
    }

    /// A provider whose run exceeds its time limit.
    #[must_use]
    pub const fn failing() -> Self {
        Self { output: None }
    }
}

impl SpeedTestProvider for FakeSpeedTest {
    fn run_speedtest(&self) -> Pin<Box<dyn Future<Output = CommandResult<String>> + Send + '_>> {
        let result = self.output.clone().ok_or_else(|| CommandError::Timeout {
            program: "speedtest-cli".to_string(),
            timeout: Duration::from_secs(60),
        });
        Box::pin(async move { result })
    }
}
