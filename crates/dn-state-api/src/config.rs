//! Telemetry configuration.

use std::time::Duration;

use crate::error::TelemetryError;

/// Default public IP lookup endpoint. Responds with `{"ip": "..."}`.
pub const DEFAULT_IP_LOOKUP_URL: &str = "http://davidnet.net/API/MyIp.php";

/// Default substring used to select rows from the process table.
pub const DEFAULT_PROCESS_PATTERN: &str = "node";

/// Default time limit for external programs.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Default time limit for the external IP lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the telemetry endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// URL queried for the external IP address.
    pub ip_lookup_url: String,
    /// Substring a process row must contain to be listed on `/Nodes`.
    pub process_pattern: String,
    /// Speed test program, run with `--json`.
    pub speedtest_program: String,
    /// Battery program, run with `-b`.
    pub battery_program: String,
    /// Process table program, run with `aux`.
    pub ps_program: String,
    /// Time limit for external programs.
    pub command_timeout: Duration,
    /// Time limit for the external IP lookup.
    pub lookup_timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            ip_lookup_url: DEFAULT_IP_LOOKUP_URL.to_string(),
            process_pattern: DEFAULT_PROCESS_PATTERN.to_string(),
            speedtest_program: "speedtest-cli".to_string(),
            battery_program: "acpi".to_string(),
            ps_program: "ps".to_string(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

impl TelemetryConfig {
    /// Set the external IP lookup URL.
    #[must_use]
    pub fn with_ip_lookup_url(mut self, url: impl Into<String>) -> Self {
        self.ip_lookup_url = url.into();
        self
    }

    /// Set the process filter pattern.
    #[must_use]
    pub fn with_process_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.process_pattern = pattern.into();
        self
    }

    /// Set the speed test program.
    #[must_use]
    pub fn with_speedtest_program(mut self, program: impl Into<String>) -> Self {
        self.speedtest_program = program.into();
        self
    }

    /// Set the battery program.
    #[must_use]
    pub fn with_battery_program(mut self, program: impl Into<String>) -> Self {
        self.battery_program = program.into();
        self
    }

    /// Set the process table program.
    #[must_use]
    pub fn with_ps_program(mut self, program: impl Into<String>) -> Self {
        self.ps_program = program.into();
        self
    }

    /// Set the external program time limit.
    #[must_use]
    pub const fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Set the IP lookup time limit.
    #[must_use]
    pub const fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is unusable.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        if !(self.ip_lookup_url.starts_with("http://") || self.ip_lookup_url.starts_with("https://"))
        {
            return Err(TelemetryError::Config(format!(
                "IP lookup URL must be http(s): {}",
                self.ip_lookup_url
            )));
        }

        if self.process_pattern.is_empty() {
            return Err(TelemetryError::Config(
                "process pattern cannot be empty".to_string(),
            ));
        }

        for (name, program) in [
            ("speedtest", &self.speedtest_program),
            ("battery", &self.battery_program),
            ("ps", &self.ps_program),
        ] {
            if program.trim().is_empty() {
                return Err(TelemetryError::Config(format!(
                    "{name} program cannot be empty"
                )));
            }
        }

        if self.command_timeout.is_zero() {
            return Err(TelemetryError::Config(
                "command timeout must be > 0".to_string(),
            ));
        }

        if self.lookup_timeout.is_zero() {
            return Err(TelemetryError::Config(
                "lookup timeout must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.ip_lookup_url, "http://davidnet.net/API/MyIp.php");
        assert_eq!(config.process_pattern, "node");
        assert_eq!(config.speedtest_program, "speedtest-cli");
        assert_eq!(config.battery_program, "acpi");
        assert_eq!(config.ps_program, "ps");
        assert_eq!(config.command_timeout, Duration::from_secs(60));
        assert_eq!(config.lookup_timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = TelemetryConfig::default()
            .with_ip_lookup_url("https://example.com/ip")
            .with_process_pattern("python")
            .with_command_timeout(Duration::from_secs(5));

        assert_eq!(config.ip_lookup_url, "https://example.com/ip");
        assert_eq!(config.process_pattern, "python");
        assert_eq!(config.command_timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = TelemetryConfig::default()
            .with_ip_lookup_url("ftp://example.com")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("must be http(s)"));
    }

    #[test]
    fn test_rejects_empty_pattern() {
        let err = TelemetryConfig::default()
            .with_process_pattern("")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("process pattern"));
    }

    #[test]
    fn test_rejects_empty_program() {
        let err = TelemetryConfig::default()
            .with_battery_program(" ")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("battery program cannot be empty"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = TelemetryConfig::default()
            .with_command_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("command timeout"));
    }
}
