//! # dn-state-api
//!
//! Host telemetry over HTTP, served on a [`dn_node`] node.
//!
//! Each endpoint is a direct read of an OS facility or an external program.
//! External programs, the Docker daemon and the public IP lookup sit behind
//! small provider traits so they can be swapped for fakes.
//!
//! ## API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/` | GET | Project link |
//! | `/Cpu` | GET | Per-core model, speed and usage |
//! | `/Ram` | GET | Memory capacity |
//! | `/Disk` | GET | Root filesystem capacity |
//! | `/IP` | GET | Internal and external addresses |
//! | `/Containers` | GET | Running containers |
//! | `/Nodes` | GET | Processes matching the configured pattern |
//! | `/Speedtest` | GET | Download, upload and ping |
//! | `/Battery` | GET | Battery charge |
//!
//! The node core adds `/State`, `/Uptime` and `/Version`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod battery;
pub mod command;
pub mod config;
pub mod containers;
pub mod error;
pub mod format;
pub mod handlers;
pub mod network;
pub mod process;
pub mod routes;
pub mod speedtest;
pub mod state;
pub mod system;

pub use battery::{AcpiBattery, BatteryProvider, BatteryReport, FakeBattery, parse_battery};
pub use command::ExternalCommand;
pub use config::TelemetryConfig;
pub use containers::{
    ContainerInfo, ContainerLister, DockerContainerLister, FakeContainers, UnavailableContainers,
};
pub use error::{CommandError, CommandResult, TelemetryError, TelemetryResult};
pub use network::{
    ExternalIpLookup, FakeIpLookup, HttpIpLookup, InterfaceAddr, IpAddresses,
    select_internal_ipv4,
};
pub use process::{FakeProcessList, ProcessEntry, ProcessListProvider, PsProcessLister};
pub use routes::telemetry_routes;
pub use speedtest::{FakeSpeedTest, SpeedTestProvider, SpeedTestReport, SpeedtestCli};
pub use state::{Providers, TelemetryState};
pub use system::{CapacityReport, CpuCore};
