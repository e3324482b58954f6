//! # Report Sinks
//!
//! Every aggregated result is appended to an "all" report; problem devices
//! also go to a "bad" report. On disk both are CSV files named after the
//! moment the run started, e.g. `20240131-142501-ALL.csv`.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::{Terminator, Writer, WriterBuilder};

use crate::models::ScanResult;

/// Header row of both reports. The leading spaces are part of the column names.
pub const CSV_HEADER: [&str; 3] = ["IP Address", " Battery Health", " Battery Temp"];
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Destination for aggregated results.
pub trait ReportWriter {
    /// Appends `result` to the all-results sink.
    fn write_all(&mut self, result: &ScanResult) -> io::Result<()>;

    /// Appends `result` to the bad-only sink.
    fn write_bad(&mut self, result: &ScanResult) -> io::Result<()>;

    /// Flushes buffered rows. Called once, after the last result.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Timestamp used in report file names, in local time.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `(<dir>/<timestamp>-ALL.csv, <dir>/<timestamp>-BAD.csv)`
pub fn report_paths(dir: &Path, timestamp: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{timestamp}-ALL.csv")),
        dir.join(format!("{timestamp}-BAD.csv")),
    )
}

/// The pair of CSV files produced by a run.
///
/// Fields holding the delimiter or quotes (device-reported health text, for
/// instance) are quoted; everything else is written verbatim.
pub struct CsvReport {
    all: Writer<File>,
    bad: Writer<File>,
    all_path: PathBuf,
    bad_path: PathBuf,
}

impl CsvReport {
    /// Creates both files in `dir` and writes their header rows.
    pub fn create(dir: &Path, timestamp: &str) -> io::Result<Self> {
        let (all_path, bad_path) = report_paths(dir, timestamp);
        let all: Writer<File> = open_csv(&all_path)?;
        let bad: Writer<File> = open_csv(&bad_path)?;

        Ok(Self {
            all,
            bad,
            all_path,
            bad_path,
        })
    }

    pub fn all_path(&self) -> &Path {
        &self.all_path
    }

    pub fn bad_path(&self) -> &Path {
        &self.bad_path
    }
}

fn open_csv(path: &Path) -> io::Result<Writer<File>> {
    let mut writer: Writer<File> = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(File::create(path)?);
    writer.write_record(CSV_HEADER)?;
    Ok(writer)
}

impl ReportWriter for CsvReport {
    fn write_all(&mut self, result: &ScanResult) -> io::Result<()> {
        Ok(self.all.write_record(result.csv_record())?)
    }

    fn write_bad(&mut self, result: &ScanResult) -> io::Result<()> {
        Ok(self.bad.write_record(result.csv_record())?)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.all.flush()?;
        self.bad.flush()
    }
}

/// Keeps results in memory; handy for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryReport {
    pub all: Vec<ScanResult>,
    pub bad: Vec<ScanResult>,
    pub finished: bool,
}

impl MemoryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_all(&self, address: &str) -> bool {
        self.all.iter().any(|r| r.address.as_str() == address)
    }

    pub fn in_bad(&self, address: &str) -> bool {
        self.bad.iter().any(|r| r.address.as_str() == address)
    }
}

impl ReportWriter for MemoryReport {
    fn write_all(&mut self, result: &ScanResult) -> io::Result<()> {
        self.all.push(result.clone());
        Ok(())
    }

    fn write_bad(&mut self, result: &ScanResult) -> io::Result<()> {
        self.bad.push(result.clone());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
