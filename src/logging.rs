use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;

use chrono::Local;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_PATH: &str = "monitor.log";

const DEFAULT_FILTER: &str = "warn";
const LINE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Diagnostics go to stderr; `RUST_LOG` overrides the default filter.
pub fn init_tracing() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}

/// Operator-facing log. Every line lands as-is after a local timestamp.
/// Lines reach the file as soon as they are written.
pub trait LogSink {
    fn line(&mut self, message: &str);
    fn flush(&mut self) {}
}

pub struct NullLog;

impl LogSink for NullLog {
    fn line(&mut self, _message: &str) {}
}

pub struct FileLog {
    writer: LineWriter<File>,
}

impl FileLog {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .wrap_err_with(|| format!("Failed to open log file {}", path.display()))?;
        Ok(FileLog {
            writer: LineWriter::new(file),
        })
    }
}

impl LogSink for FileLog {
    fn line(&mut self, message: &str) {
        let stamp = Local::now().format(LINE_TIME_FORMAT);
        if let Err(e) = writeln!(self.writer, "{stamp} {message}") {
            tracing::warn!(error = %e, "failed to write log file");
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(error = %e, "failed to flush log file");
        }
    }
}

/// File-backed sink when a path is configured, otherwise a no-op.
pub fn open_sink(path: Option<&Path>) -> Result<Box<dyn LogSink>> {
    match path {
        Some(path) => Ok(Box::new(FileLog::open(path)?)),
        None => Ok(Box::new(NullLog)),
    }
}
