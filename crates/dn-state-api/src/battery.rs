//! Battery level via `acpi -b`.

use std::future::Future;
use std::pin::Pin;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::command::ExternalCommand;
use crate::error::{CommandError, CommandResult, TelemetryError, TelemetryResult};

/// First run of digits followed by a percent sign.
static PERCENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)%").unwrap_or_else(|_| unreachable!()));

/// Battery charge as reported on `/Battery`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatteryReport {
    /// Charge percentage with a `%` suffix, e.g. `"76%"`.
    pub battery: String,
}

/// Source of raw battery status text.
pub trait BatteryProvider: Send + Sync {
    /// Read the battery status report.
    fn battery_status(&self) -> Pin<Box<dyn Future<Output = CommandResult<String>> + Send + '_>>;
}

/// Battery provider backed by `acpi -b`.
#[derive(Debug, Clone)]
pub struct AcpiBattery {
    command: ExternalCommand,
}

impl AcpiBattery {
    /// Create a provider running `program -b`.
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self {
            command: ExternalCommand::new(program, ["-b"], timeout),
        }
    }
}

impl BatteryProvider for AcpiBattery {
    fn battery_status(&self) -> Pin<Box<dyn Future<Output = CommandResult<String>> + Send + '_>> {
        Box::pin(self.command.run())
    }
}

/// Extract the first percentage from battery status text.
///
/// # Errors
///
/// Returns [`TelemetryError::BatteryParse`] if the text has no percentage.
pub fn parse_battery(output: &str) -> TelemetryResult<BatteryReport> {
    let percent = PERCENT_REGEX
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .ok_or_else(|| TelemetryError::BatteryParse(output.trim().to_string()))?;

    Ok(BatteryReport {
        battery: format!("{percent}%"),
    })
}

/// Fake battery provider for tests.
#[derive(Debug, Clone)]
pub struct FakeBattery {
    output: Option<String>,
}

impl FakeBattery {
    /// A provider that reports `output`.
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
        }
    }

    /// A provider whose program is missing.
    #[must_use]
    pub const fn failing() -> Self {
        Self { output: None }
    }
}

impl BatteryProvider for FakeBattery {
    fn battery_status(&self) -> Pin<Box<dyn Future<Output = CommandResult<String>> + Send + '_>> {
        let result = self.output.clone().ok_or_else(|| CommandError::Spawn {
            program: "acpi".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
        });
        Box::pin(async move { result })
    }
}
