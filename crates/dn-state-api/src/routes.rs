//! Route configuration for the telemetry API.

use axum::Router;
use axum::routing::get;

use crate::handlers::{
    get_battery, get_containers, get_cpu, get_disk, get_ip, get_nodes, get_ram, get_speedtest,
    index,
};
use crate::state::TelemetryState;

/// Create the telemetry router.
///
/// Merged with the node core routes at registration, which adds the 404
/// fallback and the response layers.
pub fn telemetry_routes(state: TelemetryState) -> Router {
    Router::new()
        .route("/", get(index))
        // Host resources
        .route("/Cpu", get(get_cpu))
        .route("/Ram", get(get_ram))
        .route("/Disk", get(get_disk))
        .route("/IP", get(get_ip))
        // Workloads
        .route("/Containers", get(get_containers))
        .route("/Nodes", get(get_nodes))
        // External utilities
        .route("/Speedtest", get(get_speedtest))
        .route("/Battery", get(get_battery))
        .with_state(state)
}
