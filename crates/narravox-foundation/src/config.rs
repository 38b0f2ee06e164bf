use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry/backoff knobs for per-chunk synthesis calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per chunk (valid range 3-10)
    pub max_attempts: u32,
    /// Base delay before the first retry
    pub base_delay: Duration,
    /// Multiplier applied to the delay on each subsequent attempt
    pub growth_factor: f64,
    /// Fixed wait used for quota/rate-limit signals
    pub quota_delay: Duration,
    /// Upper bound of the random jitter added to each backoff wait
    pub max_jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
            growth_factor: 2.0,
            quota_delay: Duration::from_secs(30),
            max_jitter: Duration::from_millis(500),
        }
    }
}

/// Per-generation-run configuration for the narration studio.
///
/// Inputs are user-supplied and never assumed valid; [`StudioConfig::validated`]
/// clamps out-of-range values to their working bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Selected voice identifier (validated against the catalog downstream)
    pub voice_id: String,
    /// Playback speed multiplier (0.5-2.0)
    pub speed: f32,
    /// Expressiveness level (0-10), mapped to a narration-intensity label
    pub expressiveness: u8,
    /// Requested number of script parts; 0 means auto
    pub desired_parts: usize,
    /// Target words per part when `desired_parts` is 0
    pub target_words_per_part: usize,
    /// Maximum characters per synthesis request chunk
    pub max_chunk_chars: usize,
    /// Pause between chunk requests within one segment
    pub inter_chunk_pause: Duration,
    /// Pause between completed segments during a "generate all" run
    pub inter_segment_pause: Duration,
    pub retry: RetryConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            voice_id: "Kore".to_string(),
            speed: 1.0,
            expressiveness: 5,
            desired_parts: 0,
            target_words_per_part: 2500,
            max_chunk_chars: 400,
            inter_chunk_pause: Duration::from_millis(1200),
            inter_segment_pause: Duration::from_secs(6),
            retry: RetryConfig::default(),
        }
    }
}

impl StudioConfig {
    /// Clamp user-supplied values into their working ranges.
    pub fn validated(mut self) -> Self {
        if !(0.5..=2.0).contains(&self.speed) {
            tracing::warn!(speed = self.speed, "speed out of range, clamping");
            self.speed = self.speed.clamp(0.5, 2.0);
        }
        if self.expressiveness > 10 {
            tracing::warn!(
                expressiveness = self.expressiveness,
                "expressiveness out of range, clamping"
            );
            self.expressiveness = 10;
        }
        if self.target_words_per_part == 0 {
            self.target_words_per_part = StudioConfig::default().target_words_per_part;
        }
        if self.max_chunk_chars == 0 {
            self.max_chunk_chars = StudioConfig::default().max_chunk_chars;
        }
        if !(3..=10).contains(&self.retry.max_attempts) {
            tracing::warn!(
                max_attempts = self.retry.max_attempts,
                "retry attempts out of range, clamping"
            );
            self.retry.max_attempts = self.retry.max_attempts.clamp(3, 10);
        }
        self
    }
}
