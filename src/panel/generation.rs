//! Generation tokens for overlapping invocations.
//!
//! Every trigger draws a token at invocation time; each shared surface
//! records the newest token it has applied and drops older results. This
//! makes the outcome of overlapping requests newest-invocation-wins
//! instead of arrival-order-dependent.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic source of invocation tokens.
#[derive(Debug, Default)]
pub struct GenerationCounter(AtomicU64);

impl GenerationCounter {
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Single-surface gate: admits a result only if no newer invocation has
/// already written to the surface.
#[derive(Debug, Default)]
pub struct LatestGate {
    applied: u64,
}

impl LatestGate {
    pub fn admit(&mut self, generation: u64) -> bool {
        if generation < self.applied {
            return false;
        }
        self.applied = generation;
        true
    }
}

/// Gate behind an async lock. The lock is held from admission through the
/// surface write, so a task suspended mid-write cannot interleave with a
/// newer invocation's write to the same surface.
#[derive(Debug, Default)]
pub struct SharedGate {
    inner: tokio::sync::Mutex<LatestGate>,
}

impl SharedGate {
    /// Runs `write` if `generation` is admitted, keeping the gate locked
    /// until the write finishes. Returns whether the write ran.
    pub async fn apply<F, Fut>(&self, generation: u64, write: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut gate = self.inner.lock().await;
        if !gate.admit(generation) {
            return false;
        }
        write().await;
        true
    }
}
