//! Export of completed segments: per-segment archive or merged master.

use crate::segment::{Segment, SegmentStatus};
use narravox_audio::{encode_wav, merge_buffers, AudioBuffer, AudioError};
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No completed segments to export")]
    NoCompletedSegments,

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Deterministic per-segment entry name.
pub fn segment_file_name(index: usize) -> String {
    format!("segment_{index}.wav")
}

fn completed(segments: &[Segment]) -> impl Iterator<Item = (usize, &AudioBuffer)> {
    segments
        .iter()
        .filter(|s| s.status == SegmentStatus::Done)
        .filter_map(|s| s.audio.as_ref().map(|audio| (s.index, audio)))
}

/// Bundle every completed segment's WAV into one ZIP archive.
///
/// Operates on the snapshot passed in; segments still synthesizing are
/// simply absent from the archive.
pub fn export_archive(segments: &[Segment]) -> Result<Vec<u8>, ExportError> {
    let entries: Vec<(usize, &AudioBuffer)> = completed(segments).collect();
    if entries.is_empty() {
        return Err(ExportError::NoCompletedSegments);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (index, audio) in entries {
        writer.start_file(segment_file_name(index), options)?;
        writer.write_all(&encode_wav(audio)?)?;
    }
    let cursor = writer.finish()?;
    tracing::info!(bytes = cursor.get_ref().len(), "archive export complete");
    Ok(cursor.into_inner())
}

/// Merge every completed segment in sequence order into one master WAV.
pub fn export_master(segments: &[Segment]) -> Result<Vec<u8>, ExportError> {
    let buffers: Vec<AudioBuffer> = completed(segments)
        .map(|(_, audio)| audio.clone())
        .collect();
    if buffers.is_empty() {
        return Err(ExportError::NoCompletedSegments);
    }
    let merged = merge_buffers(&buffers)?;
    tracing::info!(
        samples = merged.len(),
        duration_ms = merged.duration().as_millis() as u64,
        "master export merged"
    );
    Ok(encode_wav(&merged)?)
}
