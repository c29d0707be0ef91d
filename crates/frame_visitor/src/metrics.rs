//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single frame dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Elements handed to the visitor pipeline
    elements_visited: AtomicU64,
    /// Frames accepted by the processor
    frames_dispatched: AtomicU64,
    /// Cluster exits seen
    clusters_closed: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get elements visited
    pub fn elements_visited(&self) -> u64 {
        self.elements_visited.load(Ordering::Relaxed)
    }

    /// Increment elements visited
    pub fn inc_elements_visited(&self) {
        self.elements_visited.fetch_add(1, Ordering::Relaxed);
    }

    /// Get frames dispatched
    pub fn frames_dispatched(&self) -> u64 {
        self.frames_dispatched.load(Ordering::Relaxed)
    }

    /// Increment frames dispatched
    pub fn inc_frames_dispatched(&self) {
        self.frames_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Get clusters closed
    pub fn clusters_closed(&self) -> u64 {
        self.clusters_closed.load(Ordering::Relaxed)
    }

    /// Increment clusters closed
    pub fn inc_clusters_closed(&self) {
        self.clusters_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            elements_visited: self.elements_visited(),
            frames_dispatched: self.frames_dispatched(),
            clusters_closed: self.clusters_closed(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub elements_visited: u64,
    pub frames_dispatched: u64,
    pub clusters_closed: u64,
}
