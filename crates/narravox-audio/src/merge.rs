//! Deterministic buffer concatenation.

use crate::buffer::AudioBuffer;
use crate::error::AudioError;

/// Concatenate buffers in input order into one new buffer.
///
/// Inputs are never mutated. Buffers must share a sample rate and channel
/// count; mismatches are rejected rather than resampled, since the service
/// always delivers audio at one fixed format.
pub fn merge_buffers(buffers: &[AudioBuffer]) -> Result<AudioBuffer, AudioError> {
    let first = buffers.first().ok_or(AudioError::EmptyMerge)?;
    for buffer in &buffers[1..] {
        if buffer.sample_rate != first.sample_rate {
            return Err(AudioError::SampleRateMismatch {
                expected: first.sample_rate,
                actual: buffer.sample_rate,
            });
        }
        if buffer.channels != first.channels {
            return Err(AudioError::ChannelMismatch {
                expected: first.channels,
                actual: buffer.channels,
            });
        }
    }

    let total: usize = buffers.iter().map(|b| b.samples.len()).sum();
    let mut samples = Vec::with_capacity(total);
    for buffer in buffers {
        samples.extend_from_slice(&buffer.samples);
    }
    Ok(AudioBuffer::new(samples, first.sample_rate, first.channels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CHANNELS, SAMPLE_RATE_HZ};

    fn buf(samples: Vec<i16>) -> AudioBuffer {
        AudioBuffer::new(samples, SAMPLE_RATE_HZ, CHANNELS)
    }

    #[test]
    fn merge_concatenates_in_order() {
        let a = buf(vec![1, 2, 3]);
        let b = buf(vec![4, 5]);
        let merged = merge_buffers(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(merged.len(), a.len() + b.len());
        assert_eq!(merged.samples, vec![1, 2, 3, 4, 5]);
        assert_eq!(merged.sample_rate, SAMPLE_RATE_HZ);
        // Inputs untouched.
        assert_eq!(a.samples, vec![1, 2, 3]);
        assert_eq!(b.samples, vec![4, 5]);
    }

    #[test]
    fn merge_single_buffer_is_identity() {
        let a = buf(vec![7, 8, 9]);
        let merged = merge_buffers(std::slice::from_ref(&a)).unwrap();
        assert_eq!(merged, a);
    }

    #[test]
    fn merge_rejects_empty_input() {
        assert!(matches!(merge_buffers(&[]), Err(AudioError::EmptyMerge)));
    }

    #[test]
    fn merge_rejects_sample_rate_mismatch() {
        let a = buf(vec![1]);
        let b = AudioBuffer::new(vec![2], 44_100, CHANNELS);
        assert!(matches!(
            merge_buffers(&[a, b]),
            Err(AudioError::SampleRateMismatch {
                expected: 24_000,
                actual: 44_100
            })
        ));
    }

    #[test]
    fn merge_rejects_channel_mismatch() {
        let a = buf(vec![1]);
        let b = AudioBuffer::new(vec![2], SAMPLE_RATE_HZ, 2);
        assert!(matches!(
            merge_buffers(&[a, b]),
            Err(AudioError::ChannelMismatch { .. })
        ));
    }
}
