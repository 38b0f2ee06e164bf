//! Audio buffer handling for NarraVox
//!
//! Decoding of the speech service's raw PCM payloads, WAV container
//! encoding for export, and deterministic buffer concatenation.

pub mod buffer;
pub mod codec;
pub mod error;
pub mod merge;

pub use buffer::AudioBuffer;
pub use codec::{decode_base64_pcm, decode_pcm, decode_wav, encode_wav};
pub use error::AudioError;
pub use merge::merge_buffers;

/// Sample rate of all service-decoded audio.
pub const SAMPLE_RATE_HZ: u32 = 24_000;

/// Channel count of all service-decoded audio.
pub const CHANNELS: u16 = 1;

/// Bit depth used for PCM payloads and WAV export.
pub const BITS_PER_SAMPLE: u16 = 16;
