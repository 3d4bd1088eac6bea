//! # dn-node
//!
//! Node core for DN-Node HTTP services.
//!
//! A node reads its boot metadata from an info file, tracks a coarse health
//! state, and serves a small set of lifecycle endpoints next to whatever
//! routes the service supplies.
//!
//! ## Lifecycle
//!
//! 1. [`Node::bootstrap`] reads the info record, marks the node `Outdated` if
//!    the record is too old, and rewrites it with a fresh start time.
//! 2. [`Node::register`] binds the listener and marks the node `Healthy`.
//! 3. [`RunningNode::serve_with_shutdown`] serves until the shutdown future
//!    resolves, usually [`termination_signal`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::Router;
//! use dn_node::{Node, NodeConfig, termination_signal};
//!
//! #[tokio::main]
//! async fn main() -> dn_node::NodeResult<()> {
//!     let config = NodeConfig::default();
//!     let port = config.port;
//!
//!     let node = Node::bootstrap(config).await?;
//!     let running = node.register(port, Router::new()).await?;
//!     running.serve_with_shutdown(termination_signal()).await
//! }
//! ```
//!
//! ## Core Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/State` | GET | Health state as plain text |
//! | `/Uptime` | GET | Time since the last boot |
//! | `/Version` | GET | Service and info versions |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod health;
pub mod info;
pub mod layers;
pub mod node;
pub mod routes;
pub mod shutdown;
pub mod state;
pub mod uptime;
pub mod version;

pub use config::{DEFAULT_PORT, NodeConfig};
pub use error::{NodeError, NodeResult};
pub use health::{HealthCell, HealthEvent, HealthState};
pub use info::{DEFAULT_INFO_PATH, InfoRecord, InfoStore};
pub use node::{Node, RunningNode};
pub use shutdown::termination_signal;
pub use state::NodeContext;
pub use uptime::UptimeReport;
pub use version::{MINIMUM_INFO_VERSION, SERVICE_VERSION, VersionInfo};
