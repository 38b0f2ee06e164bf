//! Speech synthesis for NarraVox
//!
//! This crate provides the backend seam to the external speech service, the
//! voice catalog, a reusable retry policy, and the synthesis client that
//! turns one narration part into a decoded audio buffer.

pub mod backend;
pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use backend::{EncodedAudio, SynthesisBackend, SynthesisRequest};
pub use client::{ProgressFn, SynthesisClient};
pub use error::{TtsError, TtsResult};
pub use retry::{FailureClass, RetryError, RetryPolicy};
pub use types::{
    expressiveness_label, resolve_voice, SynthesisOptions, VoiceGender, VoicePersona,
    AVAILABLE_VOICES, DEFAULT_VOICE,
};
