use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::format::rfc3339;
use crate::system::snapshot::Snapshot;

pub const CSV_HEADER: [&str; 8] = [
    "Timestamp",
    "OS",
    "CPU%",
    "Memory%",
    "Disk%",
    "Load1",
    "Load5",
    "Load15",
];

/// Append-only CSV sink. The file is opened on first use and held until drop.
pub struct CsvExporter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvExporter {
            path: path.into(),
            writer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.append_at(snapshot, &Local::now())
    }

    pub fn append_at(&mut self, snapshot: &Snapshot, at: &DateTime<Local>) -> io::Result<()> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => open_with_header(&self.path)?,
        };
        let writer = self.writer.insert(writer);
        writeln!(writer, "{}", csv_row(snapshot, at))?;
        writer.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

/// Opens `path`, appends one row, and closes it again.
pub fn append_record(snapshot: &Snapshot, path: &Path) -> io::Result<()> {
    CsvExporter::new(path).append(snapshot)
}

fn open_with_header(path: &Path) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    // A fresh file and a pre-existing empty one both need the header.
    let needs_header = file.metadata()?.len() == 0;
    let mut writer = BufWriter::new(file);
    if needs_header {
        writeln!(writer, "{}", CSV_HEADER.join(","))?;
    }
    Ok(writer)
}

pub fn csv_row(snapshot: &Snapshot, at: &DateTime<Local>) -> String {
    let (load1, load5, load15) = match snapshot.load_average.values() {
        Some(v) => (
            format!("{:.2}", v.one),
            format!("{:.2}", v.five),
            format!("{:.2}", v.fifteen),
        ),
        None => (String::new(), String::new(), String::new()),
    };

    [
        rfc3339(at),
        escape_field(&snapshot.os),
        format!("{:.2}", snapshot.cpu_percent),
        format!("{:.2}", snapshot.memory.used_percent),
        format!("{:.2}", snapshot.disk.used_percent),
        load1,
        load5,
        load15,
    ]
    .join(",")
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
