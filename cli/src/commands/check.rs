use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, info_span, warn};

use crate::bprint;
use crate::terminal::{colors, print, progress};
use battcheck_common::config::ScanConfig;
use battcheck_common::network::address::AddressList;
use battcheck_common::network::source::AddressSource;
use battcheck_core::aggregator::{Summary, Verdict};
use battcheck_core::error::ScanError;
use battcheck_core::report::{CsvReport, timestamp_now};
use battcheck_core::scanner::Scan;

pub async fn check(source: &AddressSource, cfg: &ScanConfig, output_dir: &Path) -> anyhow::Result<()> {
    let addresses: AddressList = source.load()?;
    print_source_counts(&addresses);

    let mut report: CsvReport = CsvReport::create(output_dir, &timestamp_now())
        .with_context(|| format!("cannot create reports in {}", output_dir.display()))?;

    let cancel: CancellationToken = CancellationToken::new();
    let ctrl_c: JoinHandle<()> = cancel_on_ctrl_c(cancel.clone());

    print::header("checking batteries");
    let span: Span = info_span!("check", indicatif.pb_show = true);
    progress::prepare(&span, addresses.valid_count());

    let start_time: Instant = Instant::now();
    let outcome: Result<Summary, ScanError> = Scan::new(cfg)
        .with_cancellation(cancel)
        .on_result(|verdict| {
            progress::advance(&span);
            report_hot_device(verdict, cfg.temp_threshold);
        })
        .run(&addresses, &mut report)
        .instrument(span.clone())
        .await;

    ctrl_c.abort();
    drop(span);

    match outcome {
        Ok(summary) => {
            print_summary(&summary, start_time.elapsed());
            print_report_paths(&report);
            Ok(())
        }
        Err(e) => {
            bprint!();
            print::header("run incomplete");
            print_report_paths(&report);
            Err(e).context("battery check did not finish")
        }
    }
}

fn cancel_on_ctrl_c(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupted, stopping workers");
                cancel.cancel();
            }
            Err(e) => warn!("Cannot listen for Ctrl-C: {e}"),
        }
    })
}

fn report_hot_device(verdict: &Verdict, threshold: f64) {
    if verdict.high_temp {
        warn!(
            "{} is above {threshold}°C: {}",
            verdict.result.address, verdict.result.temperature
        );
    }
}

fn print_source_counts(addresses: &AddressList) {
    print::aligned_line("Addresses to check", addresses.valid_count().to_string());
    if addresses.invalid_count() > 0 {
        let invalid: ColoredString = addresses.invalid_count().to_string().color(colors::ACCENT);
        print::aligned_line("Invalid, skipped", invalid);
    }
}

fn print_summary(summary: &Summary, total_time: Duration) {
    bprint!();
    print::header("summary");

    print::aligned_line("Good", summary.good.to_string().color(colors::GOOD).bold());
    print::aligned_line("Bad", summary.bad.to_string().color(colors::BAD).bold());
    print::aligned_line(" ├─ Health", summary.health_failures().to_string());
    print::aligned_line(" ├─ High Temp", summary.hightemp.to_string());
    print::aligned_line(" └─ Unreachable/Unknown", summary.unreachable.to_string());
    if summary.parse_errors > 0 {
        print::aligned_line("    └─ Unreadable pages", summary.parse_errors.to_string());
    }
    print::aligned_line("Invalid addresses", summary.invalid.to_string());

    let devices: ColoredString = format!("{} devices", summary.received()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Check complete: {devices} checked in {total_time}").color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());
}

fn print_report_paths(report: &CsvReport) {
    print::aligned_line("All results", report.all_path().display().to_string());
    print::aligned_line("Bad results", report.bad_path().display().to_string());
    print::fat_separator();
}
