//! Shared work queue feeding the scan workers.
//!
//! A bounded tokio channel whose single receiver is shared behind a mutex,
//! which gives multi-consumer semantics: every address is handed to exactly
//! one worker, and `next` returns `None` once the producer has closed the
//! queue and it is drained.

use std::sync::Arc;

use battcheck_common::network::address::Address;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

#[derive(Clone)]
pub struct WorkQueue {
    rx: Arc<Mutex<mpsc::Receiver<Address>>>,
}

impl WorkQueue {
    /// Next address to probe, or `None` when the queue is closed and empty.
    pub async fn next(&self) -> Option<Address> {
        self.rx.lock().await.recv().await
    }
}

/// Creates a queue that can hold `capacity` addresses without blocking the producer.
pub fn work_queue(capacity: usize) -> (mpsc::Sender<Address>, WorkQueue) {
    let (tx, rx) = mpsc::channel::<Address>(capacity.max(1));
    let queue = WorkQueue {
        rx: Arc::new(Mutex::new(rx)),
    };
    (tx, queue)
}

/// Enqueues every address, then closes the queue by dropping `tx`.
///
/// Returns how many addresses were accepted; fewer than `addresses.len()`
/// only if every consumer has already gone away.
pub async fn load(tx: mpsc::Sender<Address>, addresses: &[Address]) -> usize {
    let mut loaded: usize = 0;
    for address in addresses {
        if tx.send(address.clone()).await.is_err() {
            break;
        }
        loaded += 1;
    }
    debug!("All {loaded} jobs loaded into queue");
    loaded
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
