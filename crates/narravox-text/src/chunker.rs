//! Request-sized text chunking.
//!
//! The speech service only accepts short inputs, so each narration part is
//! cut into chunks of at most `max_chars` characters. Cut points prefer, in
//! order: the Devanagari danda, a full stop, a question mark, any
//! whitespace, and finally a hard cut at the bound. Chunks are trimmed and
//! empty chunks are discarded.

/// Sentence-terminal characters in cut preference order.
const TERMINATORS: [char; 3] = ['।', '.', '?'];

/// Lazy iterator over chunks of `text`, each at most `max_chars` characters.
///
/// Deterministic: the same text and bound always yield the same sequence.
pub struct ChunkIter {
    chars: Vec<char>,
    pos: usize,
    max_chars: usize,
}

impl ChunkIter {
    pub fn new(text: &str, max_chars: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            max_chars: max_chars.max(1),
        }
    }

    /// Index of the cut character for the window starting at `self.pos`.
    ///
    /// The window spans `max_chars` characters; the chunk includes the cut
    /// character, so the result never exceeds the bound.
    fn find_cut(&self) -> usize {
        let window_end = self.pos + self.max_chars; // exclusive
        for term in TERMINATORS {
            if let Some(offset) = self.chars[self.pos..window_end]
                .iter()
                .rposition(|&c| c == term)
            {
                return self.pos + offset;
            }
        }
        if let Some(offset) = self.chars[self.pos..window_end]
            .iter()
            .rposition(|c| c.is_whitespace())
        {
            return self.pos + offset;
        }
        // No boundary inside the window: a single run longer than the bound.
        window_end - 1
    }
}

impl Iterator for ChunkIter {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.chars.len() {
                return None;
            }

            let remaining = self.chars.len() - self.pos;
            let cut = if remaining <= self.max_chars {
                self.chars.len() - 1
            } else {
                self.find_cut()
            };

            let chunk: String = self.chars[self.pos..=cut].iter().collect();
            self.pos = cut + 1;

            let chunk = chunk.trim();
            if !chunk.is_empty() {
                return Some(chunk.to_string());
            }
        }
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    ChunkIter::new(text, max_chars).collect()
}
