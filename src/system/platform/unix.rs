use std::path::Path;

use super::{DiskSpace, PlatformExtensions, statvfs_space, sysinfo_load_average};
use crate::system::snapshot::LoadAverage;

/// BSDs and other unix targets: same sources as macOS.
pub struct Platform;

impl PlatformExtensions for Platform {
    fn load_average() -> LoadAverage {
        sysinfo_load_average()
    }

    fn default_mount_point() -> &'static str {
        "/"
    }

    fn disk_space(mount_point: &Path) -> Option<DiskSpace> {
        statvfs_space(mount_point)
    }
}
