//! Error taxonomy for synthesis.

use crate::retry::FailureClass;
use narravox_audio::AudioError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    /// No usable credential before any call was attempted.
    #[error("API credential is missing; connect an account to continue")]
    MissingCredential,

    /// Mid-run credential invalidation; the caller should trigger the
    /// re-authentication flow.
    #[error("Authentication stale: {0}")]
    AuthStale(String),

    /// Content blocked by the service's safety policy.
    #[error("Content rejected by safety policy: {0}")]
    SafetyRejected(String),

    /// Rate-limit or quota signal from the service.
    #[error("Quota or rate limit reached: {0}")]
    QuotaExhausted(String),

    /// The response envelope carried no audio payload.
    #[error("No audio returned from the engine")]
    EmptyResponse,

    #[error("Invalid text input: {0}")]
    InvalidInput(String),

    /// Generic backend failure (network, internal error).
    #[error("Synthesis backend error: {0}")]
    Backend(String),

    #[error("Audio decode failed: {0}")]
    Audio(#[from] AudioError),

    /// Terminal per-chunk failure after retries were exhausted. Keeps the
    /// last attempt's error so its re-authentication signal survives.
    #[error("Chunk {index} failed after {attempts} attempts: {last_error}")]
    ChunkFailed {
        index: usize,
        attempts: u32,
        last_error: Box<TtsError>,
    },
}

pub type TtsResult<T> = Result<T, TtsError>;

impl TtsError {
    /// Classify for retry purposes.
    pub fn class(&self) -> FailureClass {
        match self {
            TtsError::MissingCredential
            | TtsError::AuthStale(_)
            | TtsError::SafetyRejected(_)
            | TtsError::InvalidInput(_)
            | TtsError::ChunkFailed { .. } => FailureClass::Fatal,
            TtsError::QuotaExhausted(_) => FailureClass::RateLimited,
            TtsError::EmptyResponse | TtsError::Backend(_) | TtsError::Audio(_) => {
                FailureClass::Transient
            }
        }
    }

    /// Whether this failure should prompt the credential-refresh flow.
    pub fn needs_reauth(&self) -> bool {
        match self {
            TtsError::MissingCredential | TtsError::AuthStale(_) | TtsError::QuotaExhausted(_) => {
                true
            }
            TtsError::ChunkFailed { last_error, .. } => last_error.needs_reauth(),
            _ => false,
        }
    }

    /// Map a raw backend message onto the taxonomy.
    ///
    /// Concrete backends only expose error strings; the known
    /// authentication-staleness, quota, and safety patterns get their typed
    /// variants, everything else stays a generic backend error.
    pub fn from_backend_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("Requested entity was not found")
            || message.contains("API key not valid")
        {
            TtsError::AuthStale(message)
        } else if message.contains("Quota") || message.contains("RESOURCE_EXHAUSTED") {
            TtsError::QuotaExhausted(message)
        } else if message.contains("SAFETY") || message.contains("blocked") {
            TtsError::SafetyRejected(message)
        } else {
            TtsError::Backend(message)
        }
    }
}
