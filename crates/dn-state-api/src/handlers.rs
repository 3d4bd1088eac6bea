//! HTTP handlers for the telemetry endpoints.

use std::path::Path;

use axum::Json;
use axum::extract::State;
use tracing::debug;

use crate::battery::{BatteryReport, parse_battery};
use crate::containers::ContainerInfo;
use crate::error::{TelemetryError, TelemetryResult};
use crate::network::{IpAddresses, interface_addrs, select_internal_ipv4};
use crate::process::{ProcessEntry, parse_ps_output};
use crate::speedtest::{SpeedTestReport, parse_speedtest};
use crate::state::TelemetryState;
use crate::system::{CapacityReport, CpuCore, cpu_cores_async, disk_usage_async, memory_usage_async};

/// Project link served on `/`.
pub const PROJECT_URL: &str = "https://github.com/dedestem/StateAPI";

/// Mount point reported on `/Disk`.
const ROOT_MOUNT: &str = "/";

/// Handle GET / - project link.
pub async fn index() -> &'static str {
    PROJECT_URL
}

/// Handle GET /Cpu - per-core CPU information.
pub async fn get_cpu() -> TelemetryResult<Json<Vec<CpuCore>>> {
    cpu_cores_async().await.map(Json)
}

/// Handle GET /Ram - memory capacity.
pub async fn get_ram() -> TelemetryResult<Json<CapacityReport>> {
    memory_usage_async().await.map(Json)
}

/// Handle GET /Disk - capacity of the root filesystem.
pub async fn get_disk() -> TelemetryResult<Json<CapacityReport>> {
    disk_usage_async(Path::new(ROOT_MOUNT)).await.map(Json)
}

/// Handle GET /IP - internal and external addresses.
pub async fn get_ip(State(state): State<TelemetryState>) -> TelemetryResult<Json<IpAddresses>> {
    let internal = select_internal_ipv4(&interface_addrs())
        .map(|addr| addr.to_string())
        .unwrap_or_default();

    let external = state.providers().ip_lookup.external_ip().await?;

    Ok(Json(IpAddresses { internal, external }))
}

/// Handle GET /Containers - running containers.
pub async fn get_containers(
    State(state): State<TelemetryState>,
) -> TelemetryResult<Json<Vec<ContainerInfo>>> {
    state
        .providers()
        .containers
        .running_containers()
        .await
        .map(Json)
}

/// Handle GET /Nodes - processes matching the configured pattern.
pub async fn get_nodes(
    State(state): State<TelemetryState>,
) -> TelemetryResult<Json<Vec<ProcessEntry>>> {
    let table = state
        .providers()
        .processes
        .process_table()
        .await
        .map_err(TelemetryError::Processes)?;

    let entries = parse_ps_output(&table, &state.config().process_pattern);
    debug!(count = entries.len(), "matched processes");

    Ok(Json(entries))
}

/// Handle GET /Speedtest - download, upload and ping.
pub async fn get_speedtest(
    State(state): State<TelemetryState>,
) -> TelemetryResult<Json<SpeedTestReport>> {
    let output = state
        .providers()
        .speedtest
        .run_speedtest()
        .await
        .map_err(TelemetryError::SpeedTest)?;

    parse_speedtest(&output).map(Json)
}

/// Handle GET /Battery - charge percentage.
pub async fn get_battery(
    State(state): State<TelemetryState>,
) -> TelemetryResult<Json<BatteryReport>> {
    let output = state
        .providers()
        .battery
        .battery_status()
        .await
        .map_err(TelemetryError::Battery)?;

    parse_battery(&output).map(Json)
}
