//! Paragraph and sentence segmentation.

use unicode_segmentation::UnicodeSegmentation;

/// Sentence segmentation over UAX#29 sentence boundaries.
pub struct SentenceSegmenter;

impl SentenceSegmenter {
    /// Split text into trimmed, non-empty sentences.
    #[must_use]
    pub fn split(text: &str) -> Vec<&str> {
        text.split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Split text into `(offset, sentence)` pairs, offsets pointing at the
    /// trimmed sentence start within `text`.
    #[must_use]
    pub fn split_with_offsets(text: &str) -> Vec<(usize, &str)> {
        text.split_sentence_bound_indices()
            .filter_map(|(offset, raw)| {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    let lead = raw.len() - raw.trim_start().len();
                    Some((offset + lead, trimmed))
                }
            })
            .collect()
    }
}

/// Split text into `(offset, paragraph)` pairs on blank lines, skipping
/// empty paragraphs. Offsets point at the trimmed paragraph start.
#[must_use]
pub fn paragraphs_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let len = text[pos..].find("\n\n").unwrap_or(text.len() - pos);
        let raw = &text[pos..pos + len];
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let lead = raw.len() - raw.trim_start().len();
            out.push((pos + lead, trimmed));
        }
        pos += len + 2;
    }
    out
}
