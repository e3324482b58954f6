//! # Result Aggregation
//!
//! The aggregator is the only consumer of worker outcomes and the only
//! writer of the summary counters. It consumes exactly as many outcomes as
//! there were valid addresses, in completion order, and routes each one to
//! the report sinks.
//!
//! Classification rules:
//! * health exactly `"Good"` counts as good, anything else as bad;
//! * health not containing `"Good"` is written to the bad report;
//! * unless health is `"Unknown"`, a temperature above the threshold counts
//!   as high and also escalates an otherwise good-looking device into the
//!   bad report. The good/bad counters are left as they are, so they can
//!   disagree with bad-report membership.

use battcheck_common::config::ScanConfig;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ScanError;
use crate::models::{GOOD_HEALTH, ScanOutcome, ScanResult};
use crate::report::ReportWriter;

/// Unit suffix printed by the phones after the temperature value.
pub const TEMPERATURE_SUFFIX: &str = " degrees Celsius";

/// Parses `"42.5 degrees Celsius"` into `42.5`. Returns `None` for anything
/// that is not a number once the unit is removed.
pub fn parse_temperature(raw: &str) -> Option<f64> {
    let value: &str = raw.split(TEMPERATURE_SUFFIX).next().unwrap_or(raw);
    value.trim().parse::<f64>().ok()
}

/// Counters for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub valid: usize,
    pub invalid: usize,
    pub good: usize,
    pub bad: usize,
    /// Devices reported as `"Unknown"`: unreachable or unreadable.
    pub unreachable: usize,
    pub hightemp: usize,
    /// Subset of `unreachable` whose response body could not be read.
    pub parse_errors: usize,
}

impl Summary {
    pub fn new(valid: usize, invalid: usize) -> Self {
        Self {
            valid,
            invalid,
            ..Self::default()
        }
    }

    /// Bad devices not explained by temperature or reachability.
    ///
    /// Signed: high-temperature devices may also be counted as good, so the
    /// difference can drop below zero.
    pub fn health_failures(&self) -> i64 {
        self.bad as i64 - (self.hightemp + self.unreachable) as i64
    }

    pub fn received(&self) -> usize {
        self.good + self.bad
    }
}

/// How one result was classified.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub result: ScanResult,
    pub good: bool,
    pub high_temp: bool,
    pub in_bad_report: bool,
}

pub struct Aggregator<'a, W: ReportWriter + ?Sized> {
    report: &'a mut W,
    threshold: f64,
    abort_on_parse_error: bool,
    summary: Summary,
}

impl<'a, W: ReportWriter + ?Sized> Aggregator<'a, W> {
    pub fn new(cfg: &ScanConfig, summary: Summary, report: &'a mut W) -> Self {
        Self {
            report,
            threshold: cfg.temp_threshold,
            abort_on_parse_error: cfg.abort_on_parse_error,
            summary,
        }
    }

    #[cfg(test)]
    fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn into_summary(self) -> Summary {
        self.summary
    }

    /// Classifies one outcome, updates the counters and writes report rows.
    pub fn record(&mut self, outcome: ScanOutcome) -> Result<Verdict, ScanError> {
        let mut abort: Option<(String, String)> = None;
        match &outcome {
            ScanOutcome::Success(_) => {}
            ScanOutcome::Unreachable { .. } => self.summary.unreachable += 1,
            ScanOutcome::ParseError { address, reason } => {
                self.summary.unreachable += 1;
                self.summary.parse_errors += 1;
                if self.abort_on_parse_error {
                    abort = Some((address.to_string(), reason.clone()));
                }
            }
        }

        let result: ScanResult = outcome.into_result();
        debug!("Got result, writing to report: {result}");
        self.report.write_all(&result)?;

        let good: bool = result.is_good();
        if good {
            self.summary.good += 1;
        } else {
            self.summary.bad += 1;
        }

        let mut in_bad_report: bool = !result.health.contains(GOOD_HEALTH);
        if in_bad_report {
            self.report.write_bad(&result)?;
        }

        let high_temp: bool = !result.is_unknown()
            && parse_temperature(&result.temperature).is_some_and(|t| t > self.threshold);
        if high_temp {
            self.summary.hightemp += 1;
            if !in_bad_report {
                self.report.write_bad(&result)?;
                in_bad_report = true;
            }
        }

        if let Some((address, reason)) = abort {
            return Err(ScanError::Aborted { address, reason });
        }

        Ok(Verdict {
            result,
            good,
            high_temp,
            in_bad_report,
        })
    }

    /// Consumes exactly `expected` outcomes from `results`.
    ///
    /// Stops early when `cancel` fires, when every sender is gone, or when
    /// [`Aggregator::record`] fails.
    pub async fn collect(
        &mut self,
        results: &mut mpsc::Receiver<ScanOutcome>,
        expected: usize,
        cancel: &CancellationToken,
        on_result: Option<&(dyn Fn(&Verdict) + '_)>,
    ) -> Result<(), ScanError> {
        let mut received: usize = 0;
        while received < expected {
            let outcome: ScanOutcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(ScanError::Cancelled { received, expected });
                }
                next = results.recv() => match next {
                    Some(outcome) => outcome,
                    None => return Err(ScanError::Incomplete { received, expected }),
                },
            };
            received += 1;

            let verdict: Verdict = self.record(outcome)?;
            if let Some(callback) = on_result {
                callback(&verdict);
            }
            debug!("Results received: {received} of {expected}, {} queued", results.len());
        }
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
