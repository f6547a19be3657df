use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;

use crate::system::snapshot::{LoadAverage, Snapshot};
use crate::thresholds::Summary;

const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Binary-prefixed size: whole bytes below 1 KB, one decimal above.
pub fn format_bytes(bytes: u64) -> String {
    const STEP: f64 = 1024.0;

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= STEP && unit < UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

pub fn rfc3339(at: &DateTime<Local>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

pub fn format_load(load: &LoadAverage) -> String {
    match load.values() {
        Some(v) => format!("{:.2}, {:.2}, {:.2}", v.one, v.five, v.fifteen),
        None => format!("unavailable ({})", load.reason().unwrap_or("unknown")),
    }
}

pub fn format_text(snapshot: &Snapshot, summary: &Summary) -> String {
    let mem = &snapshot.memory;
    let disk = &snapshot.disk;
    format!(
        "OS:            {}\n\
         CPU Usage:     {:.2}%\n\
         Memory Usage:  {:.2}% ({} / {})\n\
         Disk Usage:    {:.2}% ({} / {} on {})\n\
         Load Average:  {}\n\
         Summary:       {}\n",
        snapshot.os,
        snapshot.cpu_percent,
        mem.used_percent,
        format_bytes(mem.used_bytes),
        format_bytes(mem.total_bytes),
        disk.used_percent,
        format_bytes(disk.used_bytes),
        format_bytes(disk.total_bytes),
        disk.mount_point,
        format_load(&snapshot.load_average),
        summary,
    )
}

#[derive(Debug, Serialize)]
pub struct StructuredRecord {
    pub timestamp: String,
    pub stats: StatsRecord,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct StatsRecord {
    pub os: String,
    pub cpu_percent: f64,
    pub memory: UsageRecord,
    pub disk: DiskRecord,
    pub load_average: LoadAverage,
}

#[derive(Debug, Serialize)]
pub struct UsageRecord {
    pub used_percent: f64,
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub used: String,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct DiskRecord {
    pub mount_point: String,
    #[serde(flatten)]
    pub usage: UsageRecord,
}

impl UsageRecord {
    fn new(used_percent: f64, used_bytes: u64, total_bytes: u64) -> Self {
        UsageRecord {
            used_percent,
            used_bytes,
            total_bytes,
            used: format_bytes(used_bytes),
            total: format_bytes(total_bytes),
        }
    }
}

pub fn format_record(
    snapshot: &Snapshot,
    summary: &Summary,
    at: &DateTime<Local>,
) -> StructuredRecord {
    let mem = &snapshot.memory;
    let disk = &snapshot.disk;
    StructuredRecord {
        timestamp: rfc3339(at),
        stats: StatsRecord {
            os: snapshot.os.clone(),
            cpu_percent: snapshot.cpu_percent,
            memory: UsageRecord::new(mem.used_percent, mem.used_bytes, mem.total_bytes),
            disk: DiskRecord {
                mount_point: disk.mount_point.clone(),
                usage: UsageRecord::new(disk.used_percent, disk.used_bytes, disk.total_bytes),
            },
            load_average: snapshot.load_average.clone(),
        },
        summary: summary.to_string(),
    }
}

impl StructuredRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
