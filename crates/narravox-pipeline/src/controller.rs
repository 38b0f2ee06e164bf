//! Segment pipeline controller.
//!
//! Owns the authoritative ordered segment list. Every status change goes
//! through an element-level transition applied between suspension points,
//! so concurrently-reading consumers (progress display, export) always see
//! a consistent snapshot.

use crate::export::{self, ExportError};
use crate::metrics::PipelineMetrics;
use crate::segment::{aggregate_progress, Segment, SegmentStatus};
use narravox_audio::AudioBuffer;
use narravox_foundation::{CredentialProvider, StudioConfig};
use narravox_text::split_into_parts;
use narravox_tts::{SynthesisBackend, SynthesisClient, SynthesisOptions, TtsResult};
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Credential invalidation or quota exhaustion; the caller should
    /// prompt the re-authentication flow before continuing.
    #[error("Re-authentication required: {0}")]
    NeedsReauth(String),

    #[error("Segment {index} failed: {message}")]
    SegmentFailed { index: usize, message: String },

    #[error("No such segment: {index}")]
    UnknownSegment { index: usize },

    #[error("Segment {index} is not in the error state")]
    NotRetryable { index: usize },
}

/// Drives sequential synthesis across segments.
///
/// Single-threaded cooperative model: one "generate all" run synthesizes
/// segments strictly in ascending index order, one at a time, and halts on
/// the first failure. There is no mid-flight cancellation of an in-progress
/// call.
pub struct SegmentPipeline {
    client: SynthesisClient,
    config: StudioConfig,
    segments: Arc<RwLock<Vec<Segment>>>,
    metrics: PipelineMetrics,
}

impl SegmentPipeline {
    pub fn new(
        backend: Arc<dyn SynthesisBackend>,
        credentials: Arc<dyn CredentialProvider>,
        config: StudioConfig,
    ) -> Self {
        let config = config.validated();
        let client = SynthesisClient::new(backend, credentials, &config);
        Self {
            client,
            config,
            segments: Arc::new(RwLock::new(Vec::new())),
            metrics: PipelineMetrics::default(),
        }
    }

    pub fn metrics(&self) -> PipelineMetrics {
        self.metrics.clone()
    }

    /// Consistent copy of the segment list for readers.
    pub fn snapshot(&self) -> Vec<Segment> {
        self.segments.read().clone()
    }

    /// Mean per-segment completion, 0-100.
    pub fn progress(&self) -> f32 {
        aggregate_progress(&self.segments.read())
    }

    /// Re-segment the script, replacing the list wholesale.
    ///
    /// Segments whose fingerprint matches a prior `Done` segment carry over
    /// with their audio intact, so an unchanged script with unchanged voice
    /// and speed is never re-synthesized. Returns the segment count.
    pub fn prepare(&self, script: &str) -> usize {
        let parts = split_into_parts(
            script,
            self.config.desired_parts,
            self.config.target_words_per_part,
        );

        let mut segments = self.segments.write();
        let previous = std::mem::take(&mut *segments);
        let mut carried = 0u64;
        *segments = parts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let mut segment =
                    Segment::new(i + 1, text, &self.config.voice_id, self.config.speed);
                let reusable = previous.iter().find(|p| {
                    p.fingerprint == segment.fingerprint && p.status == SegmentStatus::Done
                });
                if let Some(prior) = reusable {
                    segment.status = SegmentStatus::Done;
                    segment.audio = prior.audio.clone();
                    segment.progress = 100.0;
                    carried += 1;
                }
                segment
            })
            .collect();

        self.metrics.increment_cache_hits(carried);
        self.metrics
            .set_overall_progress(aggregate_progress(&segments));
        let count = segments.len();
        drop(segments);

        tracing::info!(segments = count, carried, "script segmented");
        count
    }

    /// Synthesize every non-`Done` segment in ascending index order.
    ///
    /// Fail-fast: the first failing segment records its error, the run
    /// halts, and the remaining segments stay `Pending`. Completed segments
    /// are followed by a pacing pause before the next one starts.
    pub async fn generate_all(&self) -> Result<(), PipelineError> {
        let total = self.segments.read().len();
        if total == 0 {
            return Ok(());
        }
        tracing::info!(segments = total, "generate-all run started");

        for pos in 0..total {
            let status = self.segments.read().get(pos).map(|s| s.status);
            if status == Some(SegmentStatus::Done) {
                continue;
            }
            self.synthesize_one(pos).await?;
            if pos + 1 < total {
                tokio::time::sleep(self.config.inter_segment_pause).await;
            }
        }

        tracing::info!("generate-all run complete");
        Ok(())
    }

    /// Re-synthesize exactly one `Error` segment, siblings untouched.
    pub async fn retry_segment(&self, index: usize) -> Result<(), PipelineError> {
        let pos = index
            .checked_sub(1)
            .ok_or(PipelineError::UnknownSegment { index })?;
        let status = self
            .segments
            .read()
            .get(pos)
            .map(|s| s.status)
            .ok_or(PipelineError::UnknownSegment { index })?;
        if status != SegmentStatus::Error {
            return Err(PipelineError::NotRetryable { index });
        }
        self.synthesize_one(pos).await
    }

    /// Bundle completed segments into a ZIP archive (snapshot at call time).
    pub fn export_archive(&self) -> Result<Vec<u8>, ExportError> {
        export::export_archive(&self.segments.read())
    }

    /// Merge completed segments into one master WAV (snapshot at call time).
    pub fn export_master(&self) -> Result<Vec<u8>, ExportError> {
        export::export_master(&self.segments.read())
    }

    /// Synthesize a short persona sample for voice preview.
    pub async fn preview_voice(&self, voice_id: &str) -> TtsResult<AudioBuffer> {
        self.client
            .preview(voice_id, &SynthesisOptions::from_config(&self.config))
            .await
    }

    /// Apply one element-level transition and recompute aggregate progress.
    fn apply(&self, pos: usize, transition: impl FnOnce(&mut Segment)) {
        let mut segments = self.segments.write();
        if let Some(segment) = segments.get_mut(pos) {
            transition(segment);
        }
        self.metrics
            .set_overall_progress(aggregate_progress(&segments));
    }

    async fn synthesize_one(&self, pos: usize) -> Result<(), PipelineError> {
        let text = self
            .segments
            .read()
            .get(pos)
            .map(|s| s.text.clone())
            .ok_or(PipelineError::UnknownSegment { index: pos + 1 })?;

        self.apply(pos, |s| {
            s.status = SegmentStatus::Loading;
            s.progress = 0.0;
            s.error = None;
            s.audio = None;
        });

        let opts = SynthesisOptions::from_config(&self.config);
        let segments = Arc::clone(&self.segments);
        let metrics = self.metrics.clone();
        let report = move |percent: f32| {
            let mut guard = segments.write();
            if let Some(segment) = guard.get_mut(pos) {
                segment.progress = percent;
            }
            metrics.set_overall_progress(aggregate_progress(&guard));
        };

        match self.client.synthesize(&text, &opts, Some(&report)).await {
            Ok(buffer) => {
                self.apply(pos, |s| {
                    s.status = SegmentStatus::Done;
                    s.audio = Some(buffer);
                    s.progress = 100.0;
                });
                self.metrics.increment_completed();
                tracing::debug!(segment = pos + 1, "segment synthesized");
                Ok(())
            }
            Err(err) => {
                let needs_reauth = err.needs_reauth();
                let message = err.to_string();
                self.apply(pos, |s| {
                    s.status = SegmentStatus::Error;
                    s.error = Some(message.clone());
                });
                self.metrics.increment_failed();
                tracing::warn!(segment = pos + 1, error = %message, "segment failed, halting run");
                Err(if needs_reauth {
                    PipelineError::NeedsReauth(message)
                } else {
                    PipelineError::SegmentFailed {
                        index: pos + 1,
                        message,
                    }
                })
            }
        }
    }
}
