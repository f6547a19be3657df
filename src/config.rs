use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use serde::Deserialize;

use crate::logging::DEFAULT_LOG_PATH;
use crate::system::platform;
use crate::thresholds::{
    DEFAULT_CPU_THRESHOLD, DEFAULT_DISK_THRESHOLD, DEFAULT_MEMORY_THRESHOLD, Thresholds,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub thresholds: ThresholdsConfig,
    pub log: LogConfig,
    pub export: ExportConfig,
    pub disk: DiskConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Seconds between samples; zero or less samples once.
    pub interval_secs: i64,
    pub json: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        ThresholdsConfig {
            cpu: DEFAULT_CPU_THRESHOLD,
            memory: DEFAULT_MEMORY_THRESHOLD,
            disk: DEFAULT_DISK_THRESHOLD,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            enabled: false,
            path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// CSV export target; empty disables export.
    pub path: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    pub mount_point: String,
}

impl Default for DiskConfig {
    fn default() -> Self {
        DiskConfig {
            mount_point: platform::default_mount_point().to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("server-monitor").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "invalid config, using defaults"
                );
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Resolved, validated run configuration. Built once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub interval: Option<Duration>,
    pub format: OutputFormat,
    pub thresholds: Thresholds,
    pub log_path: Option<PathBuf>,
    pub export_path: Option<PathBuf>,
    pub mount_point: PathBuf,
}

impl Settings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let thresholds = Thresholds {
            cpu: check_threshold("cpu", config.thresholds.cpu)?,
            memory: check_threshold("memory", config.thresholds.memory)?,
            disk: check_threshold("disk", config.thresholds.disk)?,
        };

        let interval = u64::try_from(config.general.interval_secs)
            .ok()
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);

        let export_path = Some(config.export.path.trim())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let mount_point = if config.disk.mount_point.trim().is_empty() {
            PathBuf::from(platform::default_mount_point())
        } else {
            PathBuf::from(config.disk.mount_point.trim())
        };

        Ok(Settings {
            interval,
            format: if config.general.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            thresholds,
            log_path: config.log.enabled.then(|| config.log.path.clone()),
            export_path,
            mount_point,
        })
    }
}

fn check_threshold(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(eyre!(
            "{name} threshold must be a non-negative percentage, got {value}"
        ));
    }
    Ok(value)
}
