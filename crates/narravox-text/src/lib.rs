//! Text segmentation for NarraVox
//!
//! Two passes over the raw script:
//! - [`splitter`] cuts the full script into large narration parts (one per
//!   segment), targeting a word count per part.
//! - [`chunker`] cuts one part into request-sized chunks that the speech
//!   service accepts, preferring sentence boundaries.

pub mod chunker;
pub mod splitter;

pub use chunker::{chunk_text, ChunkIter};
pub use splitter::{split_into_parts, word_count};
