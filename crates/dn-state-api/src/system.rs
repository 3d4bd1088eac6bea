//! CPU, memory and disk statistics from the operating system.
//!
//! These reads block, so callers on the runtime should go through the async
//! wrappers, which run them on the blocking pool.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sysinfo::{Disks, System};

use crate::error::{TelemetryError, TelemetryResult};
use crate::format::format_gb;

/// One logical CPU core as served on `/Cpu`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuCore {
    /// Core name, e.g. `cpu0`.
    pub name: String,
    /// Model string.
    pub model: String,
    /// Vendor identifier.
    pub vendor: String,
    /// Frequency in MHz.
    pub speed: u64,
    /// Usage percentage since the previous sample.
    pub usage: f32,
}

/// Total, free and used capacity, formatted in GB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapacityReport {
    /// Total capacity.
    pub total: String,
    /// Available capacity.
    pub free: String,
    /// `total - free`.
    pub used: String,
}

impl CapacityReport {
    /// Build a report from byte counts.
    #[must_use]
    pub fn from_bytes(total: u64, free: u64) -> Self {
        Self {
            total: format_gb(total),
            free: format_gb(free),
            used: format_gb(total.saturating_sub(free)),
        }
    }
}

/// Sample all CPU cores.
///
/// Usage needs two refreshes, so this sleeps for the minimum update interval.
#[must_use]
pub fn cpu_cores() -> Vec<CpuCore> {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();

    sys.cpus()
        .iter()
        .map(|cpu| CpuCore {
            name: cpu.name().to_string(),
            model: cpu.brand().trim().to_string(),
            vendor: cpu.vendor_id().to_string(),
            speed: cpu.frequency(),
            usage: cpu.cpu_usage(),
        })
        .collect()
}

/// Total and available memory.
#[must_use]
pub fn memory_usage() -> CapacityReport {
    let mut sys = System::new();
    sys.refresh_memory();
    CapacityReport::from_bytes(sys.total_memory(), sys.available_memory())
}

/// Capacity of the filesystem mounted at `mount_point`.
///
/// # Errors
///
/// Returns [`TelemetryError::DiskNotFound`] if nothing is mounted there.
pub fn disk_usage(mount_point: &Path) -> TelemetryResult<CapacityReport> {
    let disks = Disks::new_with_refreshed_list();

    disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == mount_point)
        .map(|disk| CapacityReport::from_bytes(disk.total_space(), disk.available_space()))
        .ok_or_else(|| TelemetryError::DiskNotFound(mount_point.display().to_string()))
}

/// [`cpu_cores`] on the blocking pool.
pub async fn cpu_cores_async() -> TelemetryResult<Vec<CpuCore>> {
    tokio::task::spawn_blocking(cpu_cores)
        .await
        .map_err(|e| TelemetryError::Task(e.to_string()))
}

/// [`memory_usage`] on the blocking pool.
pub async fn memory_usage_async() -> TelemetryResult<CapacityReport> {
    tokio::task::spawn_blocking(memory_usage)
        .await
        .map_err(|e| TelemetryError::Task(e.to_string()))
}

/// [`disk_usage`] on the blocking pool.
pub async fn disk_usage_async(mount_point: impl Into<PathBuf>) -> TelemetryResult<CapacityReport> {
    let mount_point = mount_point.into();
    tokio::task::spawn_blocking(move || disk_usage(&mount_point))
        .await
        .map_err(|e| TelemetryError::Task(e.to_string()))?
}
