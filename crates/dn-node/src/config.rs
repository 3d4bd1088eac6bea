//! Node configuration.

use std::path::PathBuf;

use crate::error::NodeError;
use crate::info::DEFAULT_INFO_PATH;

/// Default operational port.
pub const DEFAULT_PORT: u16 = 2000;

/// Configuration for a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Location of the info file.
    pub info_path: PathBuf,
    /// Host/interface the listener binds to.
    pub bind_host: String,
    /// Operational port.
    pub port: u16,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            info_path: PathBuf::from(DEFAULT_INFO_PATH),
            bind_host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl NodeConfig {
    /// Create a configuration with the given info file.
    #[must_use]
    pub fn new(info_path: impl Into<PathBuf>) -> Self {
        Self {
            info_path: info_path.into(),
            ..Self::default()
        }
    }

    /// Set the bind host.
    #[must_use]
    pub fn with_bind_host(mut self, host: impl Into<String>) -> Self {
        self.bind_host = host.into();
        self
    }

    /// Set the operational port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is unusable.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.bind_host.trim().is_empty() {
            return Err(NodeError::Config("bind host cannot be empty".to_string()));
        }

        if self.info_path.as_os_str().is_empty() {
            return Err(NodeError::Config("info path cannot be empty".to_string()));
        }

        Ok(())
    }
}
