//! Transfer progress observation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cheap shared view of (confirmed chunks, total chunks).
///
/// Cloned handles observe the same transfer. Only the scheduler
/// driving the transfer writes; everything else reads.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    confirmed: AtomicUsize,
    total: AtomicUsize,
}

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunks confirmed by the device so far.
    pub fn confirmed(&self) -> usize {
        self.inner.confirmed.load(Ordering::Acquire)
    }

    /// Total chunks in the plan. Zero until the plan is computed.
    pub fn total(&self) -> usize {
        self.inner.total.load(Ordering::Acquire)
    }

    pub(crate) fn set_total(&self, total: usize) {
        self.inner.total.store(total, Ordering::Release);
    }

    pub(crate) fn confirm(&self) {
        self.inner.confirmed.fetch_add(1, Ordering::AcqRel);
    }
}
