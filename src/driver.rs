use std::io::{self, Write};
use std::time::Duration;

use chrono::Local;

use crate::cancel::Cancellation;
use crate::config::{OutputFormat, Settings};
use crate::export::CsvExporter;
use crate::format::{format_record, format_text, rfc3339};
use crate::logging::{LogSink, NullLog};
use crate::system::collector::SnapshotSource;
use crate::system::snapshot::Snapshot;
use crate::thresholds::{Summary, Thresholds, evaluate};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Sampling,
    Reporting,
    Stopped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Sampling attempts, failed ones included.
    pub cycles: u64,
    pub failed_samples: u64,
    pub export_failures: u64,
    pub cancelled: bool,
}

pub struct Driver<S> {
    source: S,
    thresholds: Thresholds,
    interval: Option<Duration>,
    format: OutputFormat,
    console: Box<dyn Write>,
    log: Box<dyn LogSink>,
    exporter: Option<CsvExporter>,
    state: DriverState,
}

impl<S: SnapshotSource> Driver<S> {
    pub fn new(source: S, settings: &Settings) -> Self {
        Driver {
            source,
            thresholds: settings.thresholds,
            interval: settings.interval,
            format: settings.format,
            console: Box::new(io::stdout()),
            log: Box::new(NullLog),
            exporter: settings.export_path.as_deref().map(CsvExporter::new),
            state: DriverState::Idle,
        }
    }

    pub fn with_console(mut self, console: Box<dyn Write>) -> Self {
        self.console = console;
        self
    }

    pub fn with_log(mut self, log: Box<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Samples until `cancel` fires, or once when no interval is set.
    /// Cancellation is only observed between cycles.
    pub async fn run(&mut self, cancel: &mut Cancellation) -> RunReport {
        let mut report = RunReport::default();
        self.state = DriverState::Running;
        tracing::debug!(interval = ?self.interval, format = ?self.format, "driver started");

        loop {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            self.cycle(&mut report);

            let Some(interval) = self.interval else {
                break;
            };
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
            }
        }

        if report.cancelled {
            self.print("Graceful shutdown triggered.");
            self.log.line("Shutting down gracefully.");
        }
        self.stop();
        tracing::debug!(?report, "driver stopped");
        report
    }

    fn cycle(&mut self, report: &mut RunReport) {
        report.cycles += 1;
        self.state = DriverState::Sampling;

        let snapshot = match self.source.collect() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                report.failed_samples += 1;
                self.report_error(&format!("Error collecting stats: {e}"));
                self.state = DriverState::Running;
                return;
            }
        };

        self.state = DriverState::Reporting;
        let summary = evaluate(&snapshot, &self.thresholds);
        self.report(&snapshot, &summary);

        if let Some(exporter) = self.exporter.as_mut()
            && let Err(e) = exporter.append(&snapshot)
        {
            report.export_failures += 1;
            self.report_error(&format!("CSV export error: {e}"));
        }
        self.state = DriverState::Running;
    }

    fn report(&mut self, snapshot: &Snapshot, summary: &Summary) {
        let _span = tracing::debug_span!("driver.report").entered();
        let now = Local::now();

        match self.format {
            OutputFormat::Text => {
                let text = format_text(snapshot, summary);
                self.print(&text);
                self.log.line(&format!("[{}] {}", rfc3339(&now), summary));
            }
            OutputFormat::Json => match format_record(snapshot, summary, &now).to_json() {
                Ok(json) => {
                    self.print(&json);
                    self.log.line(&json);
                }
                Err(e) => self.report_error(&format!("Error encoding stats: {e}")),
            },
        }
    }

    fn print(&mut self, text: &str) {
        if let Err(e) = writeln!(self.console, "{text}").and_then(|_| self.console.flush()) {
            tracing::warn!(error = %e, "failed to write to console");
        }
    }

    fn report_error(&mut self, message: &str) {
        tracing::error!("{message}");
        self.log.line(message);
    }

    fn stop(&mut self) {
        if let Some(exporter) = self.exporter.as_mut()
            && let Err(e) = exporter.flush()
        {
            tracing::warn!(error = %e, path = %exporter.path().display(), "failed to flush export");
        }
        self.log.flush();
        self.state = DriverState::Stopped;
    }
}
