use serde::Serialize;

/// One point-in-time reading of the host. Built once per tick by the collector.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub os: String,
    pub cpu_percent: f64,
    pub memory: MemoryUsage,
    pub disk: DiskUsage,
    pub load_average: LoadAverage,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MemoryUsage {
    pub used_percent: f64,
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl MemoryUsage {
    pub fn new(used_bytes: u64, total_bytes: u64) -> Self {
        Self {
            used_percent: percent_of(used_bytes, total_bytes),
            used_bytes,
            total_bytes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiskUsage {
    pub mount_point: String,
    pub used_percent: f64,
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl DiskUsage {
    pub fn new(mount_point: impl Into<String>, used_bytes: u64, total_bytes: u64) -> Self {
        Self {
            mount_point: mount_point.into(),
            used_percent: percent_of(used_bytes, total_bytes),
            used_bytes,
            total_bytes,
        }
    }

    /// `df`-style usage: percent of the space users can reach, so
    /// root-reserved blocks count neither as used nor as available.
    pub fn with_available(
        mount_point: impl Into<String>,
        used_bytes: u64,
        available_bytes: u64,
        total_bytes: u64,
    ) -> Self {
        Self {
            mount_point: mount_point.into(),
            used_percent: percent_of(used_bytes, used_bytes.saturating_add(available_bytes)),
            used_bytes,
            total_bytes,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LoadAverages {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Load average as resolved by the collector. Downstream code renders the
/// reason instead of numbers when the figures are missing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadAverage {
    Available(LoadAverages),
    /// The platform has no load average concept.
    Unsupported { reason: String },
    /// The platform has one but reading it failed.
    Unavailable { reason: String },
}

impl LoadAverage {
    pub fn values(&self) -> Option<LoadAverages> {
        match self {
            LoadAverage::Available(values) => Some(*values),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            LoadAverage::Available(_) => None,
            LoadAverage::Unsupported { reason } | LoadAverage::Unavailable { reason } => {
                Some(reason)
            }
        }
    }
}

fn percent_of(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}
