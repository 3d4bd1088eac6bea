//! Shared state for the telemetry handlers.

use std::sync::Arc;

use tracing::warn;

use crate::battery::{AcpiBattery, BatteryProvider};
use crate::config::TelemetryConfig;
use crate::containers::{ContainerLister, DockerContainerLister, UnavailableContainers};
use crate::error::TelemetryResult;
use crate::network::{ExternalIpLookup, HttpIpLookup};
use crate::process::{ProcessListProvider, PsProcessLister};
use crate::speedtest::{SpeedTestProvider, SpeedtestCli};

/// External collaborators queried by the telemetry endpoints.
#[derive(Clone)]
pub struct Providers {
    /// Battery status source.
    pub battery: Arc<dyn BatteryProvider>,
    /// Speed test runner.
    pub speedtest: Arc<dyn SpeedTestProvider>,
    /// Process table source.
    pub processes: Arc<dyn ProcessListProvider>,
    /// Container runtime.
    pub containers: Arc<dyn ContainerLister>,
    /// Public IP lookup.
    pub ip_lookup: Arc<dyn ExternalIpLookup>,
}

impl Providers {
    /// Real providers for this host, configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built. Invalid Docker
    /// settings only fail `/Containers`.
    pub fn system(config: &TelemetryConfig) -> TelemetryResult<Self> {
        Ok(Self {
            battery: Arc::new(AcpiBattery::new(
                &config.battery_program,
                config.command_timeout,
            )),
            speedtest: Arc::new(SpeedtestCli::new(
                &config.speedtest_program,
                config.command_timeout,
            )),
            processes: Arc::new(PsProcessLister::new(
                &config.ps_program,
                config.command_timeout,
            )),
            containers: container_lister(DockerContainerLister::connect()),
            ip_lookup: Arc::new(HttpIpLookup::new(
                &config.ip_lookup_url,
                config.lookup_timeout,
            )?),
        })
    }
}

/// Use the Docker lister, or one that fails every request if it could not connect.
fn container_lister(
    connected: TelemetryResult<DockerContainerLister>,
) -> Arc<dyn ContainerLister> {
    match connected {
        Ok(lister) => Arc::new(lister),
        Err(e) => {
            warn!(error = %e, "Docker unavailable, /Containers will fail");
            Arc::new(UnavailableContainers::new(e.to_string()))
        }
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}

/// State handed to every telemetry handler.
#[derive(Debug, Clone)]
pub struct TelemetryState {
    config: Arc<TelemetryConfig>,
    providers: Providers,
}

impl TelemetryState {
    /// Create state from a configuration and its providers.
    #[must_use]
    pub fn new(config: TelemetryConfig, providers: Providers) -> Self {
        Self {
            config: Arc::new(config),
            providers,
        }
    }

    /// The telemetry configuration.
    #[must_use]
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// The external collaborators.
    #[must_use]
    pub const fn providers(&self) -> &Providers {
        &self.providers
    }
}
