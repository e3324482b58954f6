//! The concurrent scan engine.
//!
//! [`Scan::run`] wires the pieces together:
//!
//! 1. spawns a fixed pool of workers, each owning its own [`PageFetcher`];
//! 2. loads every valid address into the [`queue::WorkQueue`] and closes it;
//! 3. aggregates exactly one outcome per address on the calling task;
//! 4. joins the pool and flushes the report.
//!
//! The result channel is bounded by the worker count, so workers slow down
//! to the aggregator's pace. Cancellation is cooperative: a child of the
//! caller's token is cancelled on any fatal aggregation error so in-flight
//! workers stop instead of waiting on a reader that is gone.

use std::sync::Arc;

use battcheck_common::config::ScanConfig;
use battcheck_common::network::address::AddressList;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::aggregator::{Aggregator, Summary, Verdict};
use crate::error::ScanError;
use crate::extract::TableExtractor;
use crate::http::{HttpFetcher, PageFetcher};
use crate::models::ScanOutcome;
use crate::report::ReportWriter;

pub mod queue;
pub mod worker;

type ResultCallback<'a> = Box<dyn Fn(&Verdict) + 'a>;

/// A configured scan, ready to run against an address list.
pub struct Scan<'a> {
    cfg: &'a ScanConfig,
    cancel: CancellationToken,
    on_result: Option<ResultCallback<'a>>,
}

impl<'a> Scan<'a> {
    pub fn new(cfg: &'a ScanConfig) -> Self {
        Self {
            cfg,
            cancel: CancellationToken::new(),
            on_result: None,
        }
    }

    /// Stops the scan early when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Called on the aggregating task after each result has been recorded.
    pub fn on_result(mut self, callback: impl Fn(&Verdict) + 'a) -> Self {
        self.on_result = Some(Box::new(callback));
        self
    }

    /// Scans `addresses` over HTTP(S), one [`HttpFetcher`] per worker.
    pub async fn run<W>(&self, addresses: &AddressList, report: &mut W) -> Result<Summary, ScanError>
    where
        W: ReportWriter + ?Sized,
    {
        let cfg: &ScanConfig = self.cfg;
        self.run_with(addresses, report, |_| {
            Ok(Box::new(HttpFetcher::new(cfg)?) as Box<dyn PageFetcher>)
        })
        .await
    }

    /// Like [`Scan::run`], with fetchers built by `make_fetcher(worker_id)`.
    pub async fn run_with<W, F>(
        &self,
        addresses: &AddressList,
        report: &mut W,
        mut make_fetcher: F,
    ) -> Result<Summary, ScanError>
    where
        W: ReportWriter + ?Sized,
        F: FnMut(usize) -> Result<Box<dyn PageFetcher>, ScanError>,
    {
        let expected: usize = addresses.valid_count();
        let summary = Summary::new(expected, addresses.invalid_count());
        if expected == 0 {
            report.finish()?;
            return Ok(summary);
        }

        let cancel: CancellationToken = self.cancel.child_token();
        let extractor: Arc<TableExtractor> = Arc::new(TableExtractor::battery()?);
        let workers: usize = self.cfg.worker_count();

        let (queue_tx, work_queue) = queue::work_queue(expected);
        let (result_tx, mut result_rx) = mpsc::channel::<ScanOutcome>(workers);

        let mut pool: JoinSet<()> = JoinSet::new();
        for id in 1..=workers {
            let fetcher: Box<dyn PageFetcher> = make_fetcher(id)?;
            pool.spawn(worker::run(
                id,
                work_queue.clone(),
                result_tx.clone(),
                fetcher,
                extractor.clone(),
                cancel.clone(),
            ));
        }
        drop(result_tx);
        debug!("Started {workers} workers for {expected} addresses");

        queue::load(queue_tx, &addresses.valid).await;

        let mut aggregator = Aggregator::new(self.cfg, summary, report);
        let collected = aggregator
            .collect(&mut result_rx, expected, &cancel, self.on_result.as_deref())
            .await;
        let summary: Summary = aggregator.into_summary();

        if collected.is_err() {
            cancel.cancel();
        }
        join_pool(&mut pool).await;

        let flushed = report.finish();
        collected?;
        flushed?;
        Ok(summary)
    }
}

async fn join_pool(pool: &mut JoinSet<()>) {
    while let Some(joined) = pool.join_next().await {
        if let Err(e) = joined {
            error!("Scan worker failed: {e}");
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
