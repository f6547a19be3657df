use proptest::prelude::*;
use server_monitor::system::snapshot::{DiskUsage, LoadAverage, MemoryUsage, Snapshot};
use server_monitor::thresholds::{Metric, Summary, Thresholds, evaluate};

fn make_snapshot(cpu: f64, mem: f64, disk: f64) -> Snapshot {
    Snapshot {
        os: "linux".to_string(),
        cpu_percent: cpu,
        memory: MemoryUsage {
            used_percent: mem,
            used_bytes: 0,
            total_bytes: 0,
        },
        disk: DiskUsage {
            mount_point: "/".to_string(),
            used_percent: disk,
            used_bytes: 0,
            total_bytes: 0,
        },
        load_average: LoadAverage::Unsupported {
            reason: "test".to_string(),
        },
    }
}

fn thresholds() -> impl Strategy<Value = Thresholds> {
    (1.0f64..99.0, 1.0f64..99.0, 1.0f64..99.0).prop_map(|(cpu, memory, disk)| Thresholds {
        cpu,
        memory,
        disk,
    })
}

proptest! {
    #[test]
    fn everything_at_or_below_limits_is_normal(
        t in thresholds(),
        fractions in (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0),
    ) {
        let snapshot = make_snapshot(
            t.cpu * fractions.0,
            t.memory * fractions.1,
            t.disk * fractions.2,
        );
        prop_assert_eq!(evaluate(&snapshot, &t), Summary::Normal);
    }

    #[test]
    fn exactly_equal_never_breaches(t in thresholds()) {
        let snapshot = make_snapshot(t.cpu, t.memory, t.disk);
        prop_assert!(evaluate(&snapshot, &t).is_normal());
    }

    #[test]
    fn single_breach_names_that_metric(
        t in thresholds(),
        which in 0usize..3,
        excess in 0.01f64..50.0,
    ) {
        let mut values = [t.cpu / 2.0, t.memory / 2.0, t.disk / 2.0];
        let limits = [t.cpu, t.memory, t.disk];
        values[which] = limits[which] + excess;
        let summary = evaluate(&make_snapshot(values[0], values[1], values[2]), &t);

        let expected = [Metric::Cpu, Metric::Memory, Metric::Disk][which];
        prop_assert_eq!(summary.breach().map(|b| b.metric), Some(expected));
        let label = format!("High {} usage", expected.label());
        prop_assert!(summary.to_string().contains(&label));
    }

    #[test]
    fn first_breach_in_cpu_memory_disk_order_wins(
        t in thresholds(),
        over in (any::<bool>(), any::<bool>(), any::<bool>()),
    ) {
        let pick = |breach: bool, limit: f64| if breach { limit + 1.0 } else { limit };
        let snapshot = make_snapshot(
            pick(over.0, t.cpu),
            pick(over.1, t.memory),
            pick(over.2, t.disk),
        );
        let expected = if over.0 {
            Some(Metric::Cpu)
        } else if over.1 {
            Some(Metric::Memory)
        } else if over.2 {
            Some(Metric::Disk)
        } else {
            None
        };
        prop_assert_eq!(evaluate(&snapshot, &t).breach().map(|b| b.metric), expected);
    }
}

#[test]
fn high_cpu_scenario_with_default_thresholds() {
    let summary = evaluate(&make_snapshot(95.0, 40.0, 50.0), &Thresholds::default());
    let text = summary.to_string();
    assert!(text.contains("High CPU usage"));
    assert!(!text.contains("memory"));
    assert!(!text.contains("disk"));
}
