//! Backend seam to the external speech capability.
//!
//! The core does not assume a concrete vendor schema: a backend accepts a
//! natural-language instruction plus a voice selector and returns a
//! base64-encoded PCM payload in a response envelope, or a typed error.

use crate::error::TtsResult;
use async_trait::async_trait;

/// One chunk-sized synthesis request.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Natural-language instruction embedding the intensity label and text.
    pub instruction: String,
    /// Validated catalog voice id.
    pub voice_id: String,
    /// Playback speed multiplier.
    pub speed: f32,
}

/// Encoded audio payload as delivered by the service envelope.
#[derive(Debug, Clone)]
pub struct EncodedAudio {
    pub payload_b64: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// External synthesis capability, one call per text chunk.
#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Issue one synthesis call. Implementations map vendor failures onto
    /// the [`crate::TtsError`] taxonomy (see
    /// [`crate::TtsError::from_backend_message`]).
    async fn synthesize_chunk(&self, request: &SynthesisRequest) -> TtsResult<EncodedAudio>;
}
