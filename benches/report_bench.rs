use chrono::Local;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use server_monitor::format::{format_bytes, format_record, format_text};
use server_monitor::system::snapshot::{
    DiskUsage, LoadAverage, LoadAverages, MemoryUsage, Snapshot,
};
use server_monitor::thresholds::{Thresholds, evaluate};
use std::hint::black_box;

fn make_snapshot(cpu: f64) -> Snapshot {
    Snapshot {
        os: "linux".to_string(),
        cpu_percent: cpu,
        memory: MemoryUsage::new(6 << 30, 16 << 30),
        disk: DiskUsage::new("/", 120 << 30, 500 << 30),
        load_average: LoadAverage::Available(LoadAverages {
            one: 1.1,
            five: 1.2,
            fifteen: 1.3,
        }),
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let thresholds = Thresholds::default();
    let mut group = c.benchmark_group("evaluate");
    for cpu in [10.0, 95.0] {
        let snapshot = make_snapshot(cpu);
        group.bench_with_input(BenchmarkId::from_parameter(cpu), &snapshot, |b, s| {
            b.iter(|| evaluate(black_box(s), black_box(&thresholds)));
        });
    }
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let snapshot = make_snapshot(95.0);
    let summary = evaluate(&snapshot, &Thresholds::default());
    let now = Local::now();

    c.bench_function("format_text", |b| {
        b.iter(|| format_text(black_box(&snapshot), black_box(&summary)));
    });
    c.bench_function("format_record_json", |b| {
        b.iter(|| {
            format_record(black_box(&snapshot), black_box(&summary), &now)
                .to_json()
                .map(|s| s.len())
        });
    });
    c.bench_function("format_bytes", |b| {
        b.iter(|| format_bytes(black_box(1_234_567_890)));
    });
}

criterion_group!(benches, bench_evaluate, bench_format);
criterion_main!(benches);
