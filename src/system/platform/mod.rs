use std::path::Path;

use crate::system::snapshot::{LoadAverage, LoadAverages};

/// Raw filesystem capacity in bytes, as `statvfs` reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiskSpace {
    pub total: u64,
    pub free: u64,
    /// Free space usable by unprivileged users; excludes root-reserved blocks.
    pub available: u64,
}

impl DiskSpace {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }
}

pub trait PlatformExtensions {
    fn load_average() -> LoadAverage;
    fn default_mount_point() -> &'static str;
    /// `None` when the platform has no finer figures than sysinfo's.
    fn disk_space(mount_point: &Path) -> Option<DiskSpace>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(all(unix, not(any(target_os = "linux", target_os = "macos"))))]
mod unix;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(all(unix, not(any(target_os = "linux", target_os = "macos"))))]
use unix as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn load_average() -> LoadAverage {
    platform_impl::Platform::load_average()
}

pub fn default_mount_point() -> &'static str {
    platform_impl::Platform::default_mount_point()
}

pub fn disk_space(mount_point: &Path) -> Option<DiskSpace> {
    platform_impl::Platform::disk_space(mount_point)
}

#[cfg(unix)]
#[allow(clippy::useless_conversion)] // field widths differ per target
fn statvfs_space(mount_point: &Path) -> Option<DiskSpace> {
    let stats = nix::sys::statvfs::statvfs(mount_point).ok()?;
    let fragment = u64::from(stats.fragment_size());
    Some(DiskSpace {
        total: u64::from(stats.blocks()).saturating_mul(fragment),
        free: u64::from(stats.blocks_free()).saturating_mul(fragment),
        available: u64::from(stats.blocks_available()).saturating_mul(fragment),
    })
}

/// getloadavg(3) through sysinfo, which reports failure as all zeros.
#[cfg(all(unix, not(target_os = "linux")))]
fn sysinfo_load_average() -> LoadAverage {
    let load = sysinfo::System::load_average();
    if load.one == 0.0 && load.five == 0.0 && load.fifteen == 0.0 {
        return LoadAverage::Unavailable {
            reason: "getloadavg returned no data".to_string(),
        };
    }
    LoadAverage::Available(LoadAverages {
        one: load.one,
        five: load.five,
        fifteen: load.fifteen,
    })
}

/// Parses the first three fields of a `/proc/loadavg`-style line.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn parse_loadavg(contents: &str) -> Option<LoadAverages> {
    let mut fields = contents.split_whitespace();
    let one = fields.next()?.parse().ok()?;
    let five = fields.next()?.parse().ok()?;
    let fifteen = fields.next()?.parse().ok()?;
    Some(LoadAverages { one, five, fifteen })
}
