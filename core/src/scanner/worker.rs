use std::sync::Arc;

use battcheck_common::network::address::Address;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::extract::{BatteryFields, TableExtractor};
use crate::http::PageFetcher;
use crate::models::{ScanOutcome, ScanResult};

use super::queue::WorkQueue;

/// Pulls addresses until the queue is drained or the scan is cancelled.
pub(crate) async fn run(
    id: usize,
    queue: WorkQueue,
    results: mpsc::Sender<ScanOutcome>,
    fetcher: Box<dyn PageFetcher>,
    extractor: Arc<TableExtractor>,
    cancel: CancellationToken,
) {
    loop {
        let address: Address = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = queue.next() => match next {
                Some(address) => address,
                None => break,
            },
        };

        debug!("Worker {id} - Working on: {address}");
        let outcome: ScanOutcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            outcome = probe(fetcher.as_ref(), &extractor, address) => outcome,
        };

        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = results.send(outcome) => sent,
        };
        if sent.is_err() {
            break;
        }
    }
    debug!("Worker {id} - Done");
}

/// Fetches and extracts one device page. Never fails: problems become
/// [`ScanOutcome`] variants.
pub async fn probe(
    fetcher: &dyn PageFetcher,
    extractor: &TableExtractor,
    address: Address,
) -> ScanOutcome {
    match fetcher.fetch(&address).await {
        Ok(body) => {
            let BatteryFields { health, temperature } = extractor.extract(&body);
            ScanOutcome::Success(ScanResult::new(address, health, temperature))
        }
        Err(FetchError::Unreachable(reason)) => {
            debug!("Cannot connect to {address}: {reason}");
            ScanOutcome::Unreachable { address, reason }
        }
        Err(FetchError::Body(reason)) => {
            warn!("Unreadable page from {address}: {reason}");
            ScanOutcome::ParseError { address, reason }
        }
    }
}
