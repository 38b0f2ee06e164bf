//! PCM payload decoding and WAV container encoding.
//!
//! The speech service delivers raw little-endian 16-bit PCM inside a
//! base64 envelope; export produces a canonical RIFF/fmt/data WAV.

use crate::buffer::AudioBuffer;
use crate::error::AudioError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::io::Cursor;

/// Decode raw little-endian 16-bit PCM bytes into a buffer.
///
/// A trailing odd byte is dropped to keep a whole-sample boundary.
pub fn decode_pcm(bytes: &[u8], sample_rate: u32, channels: u16) -> AudioBuffer {
    if bytes.len() % 2 != 0 {
        tracing::debug!(len = bytes.len(), "odd PCM payload, dropping trailing byte");
    }
    let samples = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    AudioBuffer::new(samples, sample_rate, channels)
}

/// Decode a base64-encoded PCM payload as returned by the service envelope.
pub fn decode_base64_pcm(
    payload: &str,
    sample_rate: u32,
    channels: u16,
) -> Result<AudioBuffer, AudioError> {
    let bytes = BASE64.decode(payload.trim())?;
    Ok(decode_pcm(&bytes, sample_rate, channels))
}

/// Encode a buffer into a 16-bit PCM WAV byte stream.
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>, AudioError> {
    let spec = hound::WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: crate::BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for &sample in &buffer.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

/// Decode a 16-bit PCM WAV byte stream back into a buffer.
pub fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer, AudioError> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, hound::Error>>()?;
    Ok(AudioBuffer::new(samples, spec.sample_rate, spec.channels))
}
