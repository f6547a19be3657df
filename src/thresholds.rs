//! Threshold evaluation.
//!
//! Policy is first-match: CPU is checked, then memory, then disk, and the
//! first metric strictly above its limit becomes the summary. Further
//! breaches in the same snapshot are not reported.

use std::fmt;

use crate::system::snapshot::Snapshot;

pub const DEFAULT_CPU_THRESHOLD: f64 = 80.0;
pub const DEFAULT_MEMORY_THRESHOLD: f64 = 90.0;
pub const DEFAULT_DISK_THRESHOLD: f64 = 90.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            cpu: DEFAULT_CPU_THRESHOLD,
            memory: DEFAULT_MEMORY_THRESHOLD,
            disk: DEFAULT_DISK_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Cpu,
    Memory,
    Disk,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Cpu => "CPU",
            Metric::Memory => "memory",
            Metric::Disk => "disk",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breach {
    pub metric: Metric,
    pub value: f64,
    pub threshold: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Summary {
    Normal,
    Breach(Breach),
}

impl Summary {
    pub fn is_normal(&self) -> bool {
        matches!(self, Summary::Normal)
    }

    pub fn breach(&self) -> Option<&Breach> {
        match self {
            Summary::Normal => None,
            Summary::Breach(breach) => Some(breach),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Normal => write!(f, "\u{2705} All systems normal"),
            Summary::Breach(b) => write!(
                f,
                "\u{26a0}\u{fe0f} High {} usage: {:.2}% (threshold {:.2}%)",
                b.metric.label(),
                b.value,
                b.threshold
            ),
        }
    }
}

pub fn evaluate(snapshot: &Snapshot, thresholds: &Thresholds) -> Summary {
    let checks = [
        (Metric::Cpu, snapshot.cpu_percent, thresholds.cpu),
        (Metric::Memory, snapshot.memory.used_percent, thresholds.memory),
        (Metric::Disk, snapshot.disk.used_percent, thresholds.disk),
    ];

    checks
        .into_iter()
        .find(|&(_, value, threshold)| value > threshold)
        .map(|(metric, value, threshold)| {
            Summary::Breach(Breach {
                metric,
                value,
                threshold,
            })
        })
        .unwrap_or(Summary::Normal)
}
