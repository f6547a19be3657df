use std::path::Path;

use super::{DiskSpace, PlatformExtensions, parse_loadavg, statvfs_space};
use crate::system::snapshot::LoadAverage;

const LOADAVG_PATH: &str = "/proc/loadavg";

pub struct Platform;

impl PlatformExtensions for Platform {
    fn load_average() -> LoadAverage {
        // Format: "0.52 0.58 0.59 1/467 12345"
        match std::fs::read_to_string(LOADAVG_PATH) {
            Ok(contents) => match parse_loadavg(&contents) {
                Some(values) => LoadAverage::Available(values),
                None => LoadAverage::Unavailable {
                    reason: format!("could not parse {LOADAVG_PATH}"),
                },
            },
            Err(e) => LoadAverage::Unavailable {
                reason: format!("failed to read {LOADAVG_PATH}: {e}"),
            },
        }
    }

    fn default_mount_point() -> &'static str {
        "/"
    }

    fn disk_space(mount_point: &Path) -> Option<DiskSpace> {
        statvfs_space(mount_point)
    }
}
