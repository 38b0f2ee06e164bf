//! Shared counters for pipeline monitoring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Lock-free counters readable by a progress display while a run mutates
/// them between suspension points.
#[derive(Clone, Default)]
pub struct PipelineMetrics {
    pub segments_completed: Arc<AtomicU64>,
    pub segments_failed: Arc<AtomicU64>,
    /// Segments carried over by fingerprint match on re-segmentation.
    pub cache_hits: Arc<AtomicU64>,
    /// Aggregate progress, percent * 10 for one decimal of precision.
    pub overall_progress_tenths: Arc<AtomicU64>,
}

impl PipelineMetrics {
    pub fn increment_completed(&self) {
        self.segments_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.segments_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_hits(&self, n: u64) {
        self.cache_hits.fetch_add(n, Ordering::Relaxed);
    }

    pub fn set_overall_progress(&self, percent: f32) {
        self.overall_progress_tenths
            .store((percent * 10.0) as u64, Ordering::Relaxed);
    }

    pub fn overall_progress(&self) -> f32 {
        self.overall_progress_tenths.load(Ordering::Relaxed) as f32 / 10.0
    }
}
