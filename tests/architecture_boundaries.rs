use std::fs;
use std::path::{Path, PathBuf};

fn rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

fn rel(path: &Path) -> String {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let rel = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    rel.replace('\\', "/")
}

fn assert_free_of(path: &str, forbidden: &[&str]) {
    let file = Path::new(env!("CARGO_MANIFEST_DIR")).join(path);
    let content = fs::read_to_string(&file).unwrap_or_default();
    let violations: Vec<String> = forbidden
        .iter()
        .filter(|f| content.contains(*f))
        .map(|f| format!("{} imports forbidden dependency `{}`", rel(&file), f))
        .collect();

    assert!(
        violations.is_empty(),
        "Layering violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn evaluator_is_pure() {
    assert_free_of(
        "src/thresholds.rs",
        &["std::fs", "std::io", "sysinfo", "tokio", "tracing", "crate::driver"],
    );
}

#[test]
fn formatter_does_no_io() {
    assert_free_of(
        "src/format.rs",
        &["std::fs", "std::io", "sysinfo", "tokio", "crate::driver"],
    );
}

#[test]
fn driver_does_not_touch_os_signals_or_sysinfo() {
    assert_free_of("src/driver.rs", &["tokio::signal", "sysinfo", "crate::system::platform"]);
}

#[test]
fn target_os_cfg_is_scoped_to_system_platform() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut violations = Vec::new();

    for file in rs_files(&root) {
        let content = fs::read_to_string(&file).unwrap_or_default();
        if !content.contains("target_os") {
            continue;
        }

        let rel_path = rel(&file);
        if !rel_path.starts_with("src/system/platform/") {
            violations.push(format!(
                "{} contains `target_os` cfg but is outside allowed boundary",
                rel_path
            ));
        }
    }

    assert!(
        violations.is_empty(),
        "Unexpected target_os cfg usage:\n{}",
        violations.join("\n")
    );
}
