//! Segment records and the fingerprint cache key.

use narravox_audio::AudioBuffer;
use narravox_text::word_count;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStatus {
    Pending,
    Loading,
    Done,
    Error,
}

/// One narration part tracked through its status lifecycle.
///
/// Created when the script is segmented; replaced wholesale on
/// re-segmentation. Status and audio mutate only through the controller.
/// Invariant: `audio` is `Some` exactly when `status` is `Done`.
#[derive(Debug, Clone)]
pub struct Segment {
    /// 1-based sequence index, stable within one segmentation pass.
    pub index: usize,
    pub text: String,
    pub word_count: usize,
    /// Cache key for reuse across re-segmentation.
    pub fingerprint: String,
    pub status: SegmentStatus,
    pub audio: Option<AudioBuffer>,
    pub error: Option<String>,
    /// In-flight percentage (0-100), meaningful while `Loading`.
    pub progress: f32,
}

impl Segment {
    pub fn new(index: usize, text: String, voice_id: &str, speed: f32) -> Self {
        let fingerprint = fingerprint(&text, voice_id, speed);
        let word_count = word_count(&text);
        Self {
            index,
            text,
            word_count,
            fingerprint,
            status: SegmentStatus::Pending,
            audio: None,
            error: None,
            progress: 0.0,
        }
    }

    /// Completion contribution toward aggregate progress.
    pub fn completion(&self) -> f32 {
        match self.status {
            SegmentStatus::Done => 100.0,
            _ => self.progress,
        }
    }
}

/// Deterministic cache key over text, voice, and speed.
///
/// Best-effort equality: matching fingerprints mean the prior synthesized
/// audio can be reused; this is not a cryptographic digest.
pub fn fingerprint(text: &str, voice_id: &str, speed: f32) -> String {
    let prefix: String = text.chars().take(30).collect();
    format!(
        "h_{}_{}_{}_{:.2}",
        text.chars().count(),
        prefix,
        voice_id,
        speed
    )
}

/// Mean per-segment completion across the list; 0 for an empty list.
pub fn aggregate_progress(segments: &[Segment]) -> f32 {
    if segments.is_empty() {
        return 0.0;
    }
    let total: f32 = segments.iter().map(Segment::completion).sum();
    total / segments.len() as f32
}
