//! Segment pipeline for NarraVox
//!
//! Owns the ordered segment list, drives sequential synthesis across
//! segments with pacing and fail-fast halting, tracks aggregate progress,
//! and exports completed segments as an archive or a merged master file.

pub mod controller;
pub mod export;
pub mod metrics;
pub mod segment;

pub use controller::{PipelineError, SegmentPipeline};
pub use export::{export_archive, export_master, segment_file_name, ExportError};
pub use metrics::PipelineMetrics;
pub use segment::{aggregate_progress, fingerprint, Segment, SegmentStatus};
