pub mod check;

use std::path::PathBuf;

use battcheck_common::config::{
    DEFAULT_TEMP_THRESHOLD, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS, ScanConfig,
};
use battcheck_common::network::source::AddressSource;
use clap::builder::TypedValueParser;
use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(name = "battcheck")]
#[command(about = "Checks the battery status of IP desk phones.")]
#[command(version)]
#[command(group(ArgGroup::new("source").required(true).args(["infile", "cidr"])))]
pub struct CommandLine {
    /// File with one device address per line
    #[arg(short, long, value_name = "FILE")]
    pub infile: Option<PathBuf>,

    /// Network block to check, e.g. 10.20.0.0/24
    #[arg(short, long, value_name = "BLOCK")]
    pub cidr: Option<String>,

    /// Battery temperature in °C above which a device is reported
    #[arg(long, value_name = "C", default_value_t = DEFAULT_TEMP_THRESHOLD)]
    pub temp: f64,

    /// Per-request timeout
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Log every address as it is checked
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of devices checked concurrently
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_WORKERS,
          value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub workers: usize,

    /// Where the CSV reports are written
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Stop the whole run on the first unreadable device page
    #[arg(long)]
    pub abort_on_parse_error: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            temp_threshold: self.temp,
            timeout_secs: self.timeout,
            verbose: self.verbose,
            workers: self.workers,
            abort_on_parse_error: self.abort_on_parse_error,
        }
    }

    /// The group guarantees exactly one of `--infile` and `--cidr`.
    pub fn address_source(&self) -> AddressSource {
        match &self.cidr {
            Some(block) => AddressSource::Cidr(block.clone()),
            None => AddressSource::File(self.infile.clone().unwrap_or_default()),
        }
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
