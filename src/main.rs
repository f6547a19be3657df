use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use server_monitor::cancel;
use server_monitor::config::{self, Settings, load_config, load_config_from_path};
use server_monitor::driver::Driver;
use server_monitor::logging;
use server_monitor::system::collector::Collector;

#[derive(Parser)]
#[command(
    name = "server-monitor",
    about = "Sample CPU, memory, disk and load average, and flag anything over its threshold"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds between samples (0 = run once)
    #[arg(long, allow_negative_numbers = true)]
    interval: Option<i64>,

    /// Print each sample as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Append each sample to monitor.log
    #[arg(long, default_value_t = false)]
    log: bool,

    /// CPU usage threshold (%) [default: 80]
    #[arg(long)]
    cpu_threshold: Option<f64>,

    /// Memory usage threshold (%) [default: 90]
    #[arg(long)]
    mem_threshold: Option<f64>,

    /// Disk usage threshold (%) [default: 90]
    #[arg(long)]
    disk_threshold: Option<f64>,

    /// Append each sample to this CSV file (e.g. stats.csv)
    #[arg(long)]
    export: Option<String>,

    /// Mount point whose filesystem is measured for disk usage
    #[arg(long)]
    mount: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init_tracing()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    let settings = Settings::from_config(&config)?;

    let log = logging::open_sink(settings.log_path.as_deref())?;

    let (handle, mut cancellation) = cancel::channel();
    let _listener = cancel::spawn_signal_listener(handle)?;

    let collector = Collector::new(&settings.mount_point);
    let mut driver = Driver::new(collector, &settings).with_log(log);
    let report = driver.run(&mut cancellation).await;

    tracing::info!(
        cycles = report.cycles,
        failed = report.failed_samples,
        cancelled = report.cancelled,
        "monitor finished"
    );
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(interval) = cli.interval {
        config.general.interval_secs = interval;
    }
    if cli.json {
        config.general.json = true;
    }
    if cli.log {
        config.log.enabled = true;
    }
    if let Some(cpu) = cli.cpu_threshold {
        config.thresholds.cpu = cpu;
    }
    if let Some(mem) = cli.mem_threshold {
        config.thresholds.memory = mem;
    }
    if let Some(disk) = cli.disk_threshold {
        config.thresholds.disk = disk;
    }
    if let Some(ref export) = cli.export {
        config.export.path = export.clone();
    }
    if let Some(ref mount) = cli.mount {
        config.disk.mount_point = mount.clone();
    }

    config
}
