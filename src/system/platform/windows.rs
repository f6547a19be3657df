use std::path::Path;

use super::{DiskSpace, PlatformExtensions};
use crate::system::snapshot::LoadAverage;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn load_average() -> LoadAverage {
        LoadAverage::Unsupported {
            reason: "load average is not supported on Windows".to_string(),
        }
    }

    fn default_mount_point() -> &'static str {
        "C:\\"
    }

    // NTFS has no root-reserved blocks; sysinfo's total/available is exact.
    fn disk_space(_mount_point: &Path) -> Option<DiskSpace> {
        None
    }
}
