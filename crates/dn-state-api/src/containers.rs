//! Running containers from the Docker daemon.

use std::future::Future;
use std::pin::Pin;

use bollard::Docker;
use bollard::container::ListContainersOptions;
use serde::Serialize;
use tracing::debug;

use crate::error::{TelemetryError, TelemetryResult};

/// Summary of a running container served on `/Containers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerInfo {
    /// Container ID.
    pub id: String,
    /// Container names, each with a leading `/`.
    pub names: Vec<String>,
    /// Image reference.
    pub image: String,
    /// Command the container runs.
    pub command: String,
    /// Creation time, seconds since the Unix epoch.
    pub created: i64,
    /// Runtime state, e.g. `running`.
    pub state: String,
    /// Human-readable status, e.g. `Up 3 hours`.
    pub status: String,
}

/// Lists running containers.
pub trait ContainerLister: Send + Sync {
    /// List the containers that are currently running.
    fn running_containers(
        &self,
    ) -> Pin<Box<dyn Future<Output = TelemetryResult<Vec<ContainerInfo>>> + Send + '_>>;
}

/// Container lister backed by the local Docker daemon.
pub struct DockerContainerLister {
    client: Docker,
}

impl std::fmt::Debug for DockerContainerLister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockerContainerLister").finish_non_exhaustive()
    }
}

impl DockerContainerLister {
    /// Connect to the Docker daemon using the local defaults.
    ///
    /// No request is made until the first listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection settings are invalid.
    pub fn connect() -> TelemetryResult<Self> {
        let client = Docker::connect_with_local_defaults().map_err(|e| {
            TelemetryError::Containers(format!("failed to connect to Docker: {e}"))
        })?;

        Ok(Self { client })
    }
}

impl ContainerLister for DockerContainerLister {
    fn running_containers(
        &self,
    ) -> Pin<Box<dyn Future<Output = TelemetryResult<Vec<ContainerInfo>>> + Send + '_>> {
        Box::pin(async move {
            let options = ListContainersOptions::<String> {
                all: false,
                ..Default::default()
            };

            let containers = self
                .client
                .list_containers(Some(options))
                .await
                .map_err(|e| TelemetryError::Containers(e.to_string()))?;

            debug!(count = containers.len(), "listed running containers");

            Ok(containers
                .into_iter()
                .map(|c| ContainerInfo {
                    id: c.id.unwrap_or_default(),
                    names: c.names.unwrap_or_default(),
                    image: c.image.unwrap_or_default(),
                    command: c.command.unwrap_or_default(),
                    created: c.created.unwrap_or_default(),
                    state: c.state.unwrap_or_default(),
                    status: c.status.unwrap_or_default(),
                })
                .collect())
        })
    }
}

/// Lister installed when the Docker client could not be built.
///
/// Every listing fails with the connection error, so `/Containers` answers
/// 500 while the rest of the service keeps running.
#[derive(Debug, Clone)]
pub struct UnavailableContainers {
    reason: String,
}

impl UnavailableContainers {
    /// A lister that always reports `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ContainerLister for UnavailableContainers {
    fn running_containers(
        &self,
    ) -> Pin<Box<dyn Future<Output = TelemetryResult<Vec<ContainerInfo>>> + Send + '_>> {
        Box::pin(async move { Err(TelemetryError::Containers(self.reason.clone())) })
    }
}

/// Fake container lister for tests.
#[derive(Debug, Clone, Default)]
pub struct FakeContainers {
    containers: Vec<ContainerInfo>,
    fail: bool,
}

impl FakeContainers {
    /// A lister with no running containers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a running container.
    #[must_use]
    pub fn with_container(mut self, id: &str, name: &str, image: &str) -> Self {
        self.containers.push(ContainerInfo {
            id: id.to_string(),
            names: vec![format!("/{name}")],
            image: image.to_string(),
            command: String::new(),
            created: 0,
            state: "running".to_string(),
            status: "Up 1 second".to_string(),
        });
        self
    }

    /// A lister whose daemon is unreachable.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            containers: Vec::new(),
            fail: true,
        }
    }
}

impl ContainerLister for FakeContainers {
    fn running_containers(
        &self,
    ) -> Pin<Box<dyn Future<Output = TelemetryResult<Vec<ContainerInfo>>> + Send + '_>> {
        Box::pin(async move {
            if self.fail {
                return Err(TelemetryError::Containers(
                    "daemon unreachable".to_string(),
                ));
            }
            Ok(self.containers.clone())
        })
    }
}
