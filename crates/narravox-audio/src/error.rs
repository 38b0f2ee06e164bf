use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No buffers to merge")]
    EmptyMerge,

    #[error("Sample rate mismatch: expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },

    #[error("Channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: u16, actual: u16 },

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}
