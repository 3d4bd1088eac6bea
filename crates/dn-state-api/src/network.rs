//! Internal and external IP addresses.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr};
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{TelemetryError, TelemetryResult};

/// Addresses served on `/IP`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpAddresses {
    /// First non-loopback IPv4 address, or empty if there is none.
    pub internal: String,
    /// Public address as reported by the lookup service.
    pub external: String,
}

/// An address bound to a named interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddr {
    /// Interface name, e.g. `eth0`.
    pub interface: String,
    /// Address assigned to the interface.
    pub addr: IpAddr,
}

impl InterfaceAddr {
    /// Create an interface address.
    #[must_use]
    pub fn new(interface: impl Into<String>, addr: IpAddr) -> Self {
        Self {
            interface: interface.into(),
            addr,
        }
    }
}

/// Pick the first IPv4 address that is not loopback.
///
/// Addresses are considered in the order given.
#[must_use]
pub fn select_internal_ipv4(addrs: &[InterfaceAddr]) -> Option<Ipv4Addr> {
    addrs.iter().find_map(|entry| match entry.addr {
        IpAddr::V4(v4) if !v4.is_loopback() => Some(v4),
        _ => None,
    })
}

/// Enumerate interface addresses in system order.
///
/// Enumeration failures are logged and yield an empty list.
#[must_use]
pub fn interface_addrs() -> Vec<InterfaceAddr> {
    match local_ip_address::list_afinet_netifas() {
        Ok(list) => list
            .into_iter()
            .map(|(name, addr)| InterfaceAddr::new(name, addr))
            .collect(),
        Err(e) => {
            warn!(error = %e, "failed to enumerate network interfaces");
            Vec::new()
        }
    }
}

/// Resolves the host's public IP address.
pub trait ExternalIpLookup: Send + Sync {
    /// Look up the public IP address.
    fn external_ip(&self) -> Pin<Box<dyn Future<Output = TelemetryResult<String>> + Send + '_>>;
}

/// Response body of the lookup service.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    ip: String,
}

/// External IP lookup over HTTP.
#[derive(Debug, Clone)]
pub struct HttpIpLookup {
    client: reqwest::Client,
    url: String,
}

impl HttpIpLookup {
    /// Create a lookup against `url` with a request time limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> TelemetryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TelemetryError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Lookup URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ExternalIpLookup for HttpIpLookup {
    fn external_ip(&self) -> Pin<Box<dyn Future<Output = TelemetryResult<String>> + Send + '_>> {
        Box::pin(async move {
            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| TelemetryError::IpLookup(e.to_string()))?;

            let body: LookupResponse = response
                .json()
                .await
                .map_err(|e| TelemetryError::IpLookup(e.to_string()))?;

            Ok(body.ip)
        })
    }
}

/// Fake IP lookup for tests.
#[derive(Debug, Clone)]
pub struct FakeIpLookup {
    ip: Option<String>,
}

impl FakeIpLookup {
    /// A lookup that returns `ip`.
    #[must_use]
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
        }
    }

    /// A lookup whose service is unreachable.
    #[must_use]
    pub const fn failing() -> Self {
        Self { ip: None }
    }
}

impl ExternalIpLookup for FakeIpLookup {
    fn external_ip(&self) -> Pin<Box<dyn Future<Output = TelemetryResult<String>> + Send + '_>> {
        let result = self
            .ip
            .clone()
            .ok_or_else(|| TelemetryError::IpLookup("connection refused".to_string()));
        Box::pin(async move { result })
    }
}
