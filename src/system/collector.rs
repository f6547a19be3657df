use std::path::{Path, PathBuf};

use sysinfo::{Disks, System};
use thiserror::Error;

use super::platform::{self, DiskSpace};
use super::snapshot::{DiskUsage, MemoryUsage, Snapshot};

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("cpu usage unavailable: {0}")]
    Cpu(String),
    #[error("memory usage unavailable: {0}")]
    Memory(String),
    #[error("disk usage unavailable for {mount_point}: {reason}")]
    Disk { mount_point: String, reason: String },
}

/// Anything that can hand the driver a fresh snapshot.
pub trait SnapshotSource {
    fn collect(&mut self) -> Result<Snapshot, CollectError>;
}

pub struct Collector {
    sys: System,
    mount_point: PathBuf,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(platform::default_mount_point())
    }
}

impl Collector {
    pub fn new(mount_point: impl Into<PathBuf>) -> Self {
        Collector {
            sys: System::new(),
            mount_point: mount_point.into(),
        }
    }

    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }

    fn sample_cpu(&mut self) -> Result<f64, CollectError> {
        let _span = tracing::debug_span!("collector.cpu").entered();

        // Usage is a delta between two refreshes, so block for one window.
        self.sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        self.sys.refresh_cpu_usage();

        if self.sys.cpus().is_empty() {
            return Err(CollectError::Cpu("no cpus reported".to_string()));
        }
        let usage = f64::from(self.sys.global_cpu_usage());
        if !usage.is_finite() {
            return Err(CollectError::Cpu(format!("invalid reading {usage}")));
        }
        Ok(usage.clamp(0.0, 100.0))
    }

    fn sample_memory(&mut self) -> Result<MemoryUsage, CollectError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(CollectError::Memory("total memory reported as 0".to_string()));
        }
        Ok(MemoryUsage::new(self.sys.used_memory().min(total), total))
    }

    fn sample_disk(&self) -> Result<DiskUsage, CollectError> {
        let disks = Disks::new_with_refreshed_list();
        let mounts = disks
            .list()
            .iter()
            .map(|d| (d.mount_point(), d.total_space(), d.available_space()));
        let (mount, total, available) =
            best_mount(&self.mount_point, mounts).ok_or_else(|| CollectError::Disk {
                mount_point: self.mount_point.display().to_string(),
                reason: "no mounted filesystem contains this path".to_string(),
            })?;

        let name = mount.display().to_string();
        disk_usage(name, platform::disk_space(mount), total, available)
    }
}

/// Prefers the platform's `statvfs` figures; falls back to sysinfo's
/// total/available when the platform has none.
fn disk_usage(
    mount_point: String,
    space: Option<DiskSpace>,
    total: u64,
    available: u64,
) -> Result<DiskUsage, CollectError> {
    match space {
        Some(space) if space.total > 0 => Ok(DiskUsage::with_available(
            mount_point,
            space.used(),
            space.available,
            space.total,
        )),
        _ if total == 0 => Err(CollectError::Disk {
            mount_point,
            reason: "filesystem reports zero capacity".to_string(),
        }),
        _ => Ok(DiskUsage::new(mount_point, total.saturating_sub(available), total)),
    }
}

impl SnapshotSource for Collector {
    fn collect(&mut self) -> Result<Snapshot, CollectError> {
        let _span = tracing::debug_span!("collector.collect").entered();

        let cpu_percent = self.sample_cpu()?;
        let memory = self.sample_memory()?;
        let disk = self.sample_disk()?;
        let load_average = platform::load_average();
        if let Some(reason) = load_average.reason() {
            tracing::debug!(reason, "load average not available");
        }

        Ok(Snapshot {
            os: std::env::consts::OS.to_string(),
            cpu_percent,
            memory,
            disk,
            load_average,
        })
    }
}

/// Picks the mounted filesystem with the longest mount point containing `target`.
fn best_mount<'a, I>(target: &Path, mounts: I) -> Option<(&'a Path, u64, u64)>
where
    I: IntoIterator<Item = (&'a Path, u64, u64)>,
{
    mounts
        .into_iter()
        .filter(|(mount, _, _)| target.starts_with(mount))
        .max_by_key(|(mount, _, _)| mount.components().count())
}
