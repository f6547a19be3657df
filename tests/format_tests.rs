use insta::assert_snapshot;
use server_monitor::format::{format_bytes, format_text};
use server_monitor::system::snapshot::{
    DiskUsage, LoadAverage, LoadAverages, MemoryUsage, Snapshot,
};
use server_monitor::thresholds::{Thresholds, evaluate};

const GIB: u64 = 1024 * 1024 * 1024;

fn linux_host() -> Snapshot {
    Snapshot {
        os: "linux".to_string(),
        cpu_percent: 50.5,
        memory: MemoryUsage::new(6 * GIB, 16 * GIB),
        disk: DiskUsage::new("/", 120 * GIB, 500 * GIB),
        load_average: LoadAverage::Available(LoadAverages {
            one: 1.1,
            five: 1.2,
            fifteen: 1.3,
        }),
    }
}

fn busy_windows_host() -> Snapshot {
    Snapshot {
        os: "windows".to_string(),
        cpu_percent: 97.25,
        memory: MemoryUsage::new(3 * GIB, 4 * GIB),
        disk: DiskUsage::new("C:\\", 10 * GIB, 40 * GIB),
        load_average: LoadAverage::Unsupported {
            reason: "load average is not supported on Windows".to_string(),
        },
    }
}

#[test]
fn text_report_layout() {
    let snapshot = linux_host();
    let summary = evaluate(&snapshot, &Thresholds::default());
    let text = format_text(&snapshot, &summary);
    assert_snapshot!("text_report_layout", text.trim_end());
}

#[test]
fn text_report_with_breach_and_no_load_average() {
    let snapshot = busy_windows_host();
    let summary = evaluate(&snapshot, &Thresholds::default());
    let text = format_text(&snapshot, &summary);
    assert_snapshot!("text_report_breach", text.trim_end());
}

#[test]
fn every_percentage_has_two_decimals() {
    let text = format_text(&linux_host(), &evaluate(&linux_host(), &Thresholds::default()));
    for line in text.lines().filter(|l| l.contains('%')) {
        let pct = line
            .split_whitespace()
            .find(|w| w.ends_with('%'))
            .unwrap();
        let decimals = pct.trim_end_matches('%').split('.').nth(1).unwrap();
        assert_eq!(decimals.len(), 2, "bad percentage in {line:?}");
    }
}

#[test]
fn byte_formatting_reference_values() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(1536), "1.5 KB");
    assert_eq!(format_bytes(1_048_576), "1.0 MB");
}
