//! Per-signer serialization gate.
//!
//! Within one process, no two submissions may run their "observe nonce →
//! broadcast" critical section for the same signer address concurrently,
//! or they would race on the provider's pending count. The gate keeps one
//! async mutex per address; tokio mutexes admit waiters in FIFO order, so
//! submissions for an address run strictly in arrival order. Different
//! addresses proceed independently.
//!
//! A failed operation releases the lock like any other; errors are
//! returned to the caller and never wedge the queue.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct SerializationGate {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SerializationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `operation` once no earlier operation for `address` is still
    /// in flight. Returns the operation's own result, success or failure.
    pub async fn run_exclusive<F, T>(&self, address: &str, operation: F) -> T
    where
        F: Future<Output = T>,
    {
        let lock = {
            let entry = self
                .locks
                .entry(address.to_string())
                .or_default();
            Arc::clone(entry.value())
        };
        let _guard = lock.lock().await;
        operation.await
    }
}
