//! Coarse script splitting into narration parts.
//!
//! One part becomes one segment of work; each part is later re-chunked into
//! request-sized pieces at synthesis time. Parts target a word count and cut
//! at a sentence-final word, tolerating an overshoot of up to 30% of the
//! target before a cut is forced.

/// Characters that mark a word as sentence-final.
const SENTENCE_FINAL: &[char] = &['.', '।', '?'];

/// Allowed overshoot past the target before forcing a cut.
const OVERSHOOT_FACTOR: f64 = 1.3;

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split `text` into narration parts.
///
/// When `desired_parts` is 0 the target is `target_words_per_part`;
/// otherwise the target is the total word count divided evenly across the
/// requested parts. Deterministic, order-preserving; joining the parts with
/// single spaces reconstructs the whitespace-collapsed script.
pub fn split_into_parts(
    text: &str,
    desired_parts: usize,
    target_words_per_part: usize,
) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let target = if desired_parts > 0 {
        words.len().div_ceil(desired_parts)
    } else {
        target_words_per_part
    }
    .max(1);
    let forced_cut = (target as f64 * OVERSHOOT_FACTOR) as usize;

    let mut parts = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for (i, word) in words.iter().enumerate() {
        current.push(word);
        let is_last = i == words.len() - 1;
        if !is_last && current.len() >= target {
            if word.ends_with(SENTENCE_FINAL) || current.len() >= forced_cut {
                parts.push(current.join(" "));
                current.clear();
            }
        }
    }
    if !current.is_empty() {
        parts.push(current.join(" "));
    }

    tracing::debug!(
        words = words.len(),
        target,
        parts = parts.len(),
        "script split into parts"
    );
    parts
}
