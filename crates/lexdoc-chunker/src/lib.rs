//! # lexdoc-chunker
//!
//! Token-budgeted chunker for extracted document text. Splits on
//! paragraph boundaries, falls back to sentence boundaries for oversized
//! paragraphs, and seeds each new chunk with a whole-sentence overlap
//! tail from the previous one for context continuity.
//!
//! ## Quick start
//!
//! ```rust
//! use lexdoc_chunker::TextChunker;
//!
//! let chunker = TextChunker::default();
//! let chunks = chunker.chunk("Eerste alinea.\n\nTweede alinea.");
//! assert_eq!(chunks.len(), 1);
//! ```

pub mod overlap;
pub mod segment;

use lexdoc_core::{TextChunk, TokenCounter};
use overlap::sentence_suffix;
use segment::{paragraphs_with_offsets, SentenceSegmenter};

/// Chunking options.
#[derive(Debug, Clone, Copy)]
pub struct ChunkOptions {
    /// Hard token ceiling per chunk. A chunk may only exceed it when a
    /// single paragraph/sentence alone is larger than the budget.
    pub max_tokens: usize,
    /// Token budget for the sentence-boundary overlap between
    /// consecutive chunks.
    pub overlap_tokens: usize,
    /// Split oversized paragraphs at sentence boundaries (also required
    /// for overlap, which is sentence-based).
    pub respect_sentences: bool,
    /// Accumulate whole paragraphs; when disabled the input is treated
    /// as one paragraph.
    pub respect_paragraphs: bool,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_tokens: 800,
            overlap_tokens: 100,
            respect_sentences: true,
            respect_paragraphs: true,
        }
    }
}

/// A segment queued for chunk accumulation: a paragraph, or a sentence
/// from an oversized paragraph.
#[derive(Debug, Clone, Copy)]
struct Unit<'a> {
    offset: usize,
    text: &'a str,
}

/// Token-aware text chunker.
pub struct TextChunker {
    options: ChunkOptions,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(ChunkOptions::default())
    }
}

impl TextChunker {
    /// Create a chunker with the given options.
    #[must_use]
    pub const fn new(options: ChunkOptions) -> Self {
        Self { options }
    }

    /// Create a builder for custom configuration.
    #[must_use]
    pub fn builder() -> TextChunkerBuilder {
        TextChunkerBuilder::new()
    }

    /// Configured options.
    #[must_use]
    pub const fn options(&self) -> &ChunkOptions {
        &self.options
    }

    /// Split `text` into overlapping, token-bounded chunks.
    ///
    /// Empty or whitespace-only input yields an empty vector; any
    /// non-empty input yields at least one chunk.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let units = self.units(text);
        if units.is_empty() {
            return Vec::new();
        }

        let max = self.options.max_tokens;
        let mut chunks: Vec<TextChunk> = Vec::new();
        let mut prefix = String::new();
        let mut buf: Vec<Unit<'_>> = Vec::new();

        for unit in units {
            let candidate = Self::candidate_tokens(&prefix, &buf, Some(unit));
            if candidate <= max {
                buf.push(unit);
                continue;
            }

            if buf.is_empty() {
                // The overlap prefix alone cannot absorb this unit; drop
                // the overlap before declaring the unit oversized.
                if !prefix.is_empty() {
                    prefix.clear();
                    if TokenCounter::estimate(unit.text) <= max {
                        buf.push(unit);
                        continue;
                    }
                }
                // A single paragraph/sentence above the budget becomes
                // exactly one chunk; no silent truncation.
                self.emit(&mut chunks, "", &[unit]);
                prefix = self.next_overlap(&chunks);
                continue;
            }

            self.emit(&mut chunks, &prefix, &buf);
            buf.clear();
            prefix = self.next_overlap(&chunks);
            if Self::candidate_tokens(&prefix, &buf, Some(unit)) > max {
                prefix.clear();
            }
            buf.push(unit);
        }

        if !buf.is_empty() {
            self.emit(&mut chunks, &prefix, &buf);
        }

        chunks
    }

    /// Page-aware variant: runs the same algorithm per page, attaches
    /// 1-based `page_number` metadata and renumbers chunk indices
    /// globally. Empty pages are skipped; overlap never crosses a page
    /// boundary.
    #[must_use]
    pub fn chunk_pages(&self, pages: &[String]) -> Vec<TextChunk> {
        let mut all = Vec::new();
        for (page_idx, page) in pages.iter().enumerate() {
            let mut page_chunks = self.chunk(page);
            for chunk in &mut page_chunks {
                chunk.page_number = Some(page_idx + 1);
            }
            all.append(&mut page_chunks);
        }
        for (index, chunk) in all.iter_mut().enumerate() {
            chunk.index = index;
        }
        all
    }

    /// Break text into accumulation units: paragraphs, with oversized
    /// paragraphs exploded into sentences.
    fn units<'a>(&self, text: &'a str) -> Vec<Unit<'a>> {
        let paragraphs: Vec<(usize, &str)> = if self.options.respect_paragraphs {
            paragraphs_with_offsets(text)
        } else {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                let lead = text.len() - text.trim_start().len();
                vec![(lead, trimmed)]
            }
        };

        let mut units = Vec::new();
        for (offset, paragraph) in paragraphs {
            if self.options.respect_sentences
                && TokenCounter::estimate(paragraph) > self.options.max_tokens
            {
                for (sentence_offset, sentence) in SentenceSegmenter::split_with_offsets(paragraph)
                {
                    units.push(Unit {
                        offset: offset + sentence_offset,
                        text: sentence,
                    });
                }
            } else {
                units.push(Unit {
                    offset,
                    text: paragraph,
                });
            }
        }
        units
    }

    /// Token count of the would-be chunk text for a buffer plus an
    /// optional extra unit.
    fn candidate_tokens(prefix: &str, buf: &[Unit<'_>], extra: Option<Unit<'_>>) -> usize {
        let mut parts: Vec<&str> = Vec::with_capacity(buf.len() + 2);
        if !prefix.is_empty() {
            parts.push(prefix);
        }
        parts.extend(buf.iter().map(|u| u.text));
        if let Some(unit) = extra {
            parts.push(unit.text);
        }
        TokenCounter::estimate(&parts.join("\n\n"))
    }

    fn emit(&self, chunks: &mut Vec<TextChunk>, prefix: &str, buf: &[Unit<'_>]) {
        let core = buf
            .iter()
            .map(|u| u.text)
            .collect::<Vec<_>>()
            .join("\n\n");
        let text = if prefix.is_empty() {
            core
        } else {
            format!("{prefix}\n\n{core}")
        };
        let first = buf.first().expect("emit called with non-empty buffer");
        let last = buf.last().expect("emit called with non-empty buffer");
        let token_count = TokenCounter::estimate(&text);
        chunks.push(TextChunk {
            text,
            index: chunks.len(),
            token_count,
            start_char: first.offset,
            end_char: last.offset + last.text.len(),
            page_number: None,
            section_title: None,
        });
    }

    /// Overlap tail for the next chunk, from the last emitted chunk.
    fn next_overlap(&self, chunks: &[TextChunk]) -> String {
        if self.options.overlap_tokens == 0 || !self.options.respect_sentences {
            return String::new();
        }
        chunks
            .last()
            .map(|c| sentence_suffix(&c.text, self.options.overlap_tokens))
            .unwrap_or_default()
    }
}

/// Builder for configuring a [`TextChunker`].
pub struct TextChunkerBuilder {
    options: ChunkOptions,
}

impl TextChunkerBuilder {
    /// Create a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: ChunkOptions::default(),
        }
    }

    /// Maximum tokens per chunk. Default: 800.
    #[must_use]
    pub const fn max_tokens(mut self, max: usize) -> Self {
        self.options.max_tokens = max;
        self
    }

    /// Target overlap tokens between chunks. Default: 100.
    #[must_use]
    pub const fn overlap_tokens(mut self, overlap: usize) -> Self {
        self.options.overlap_tokens = overlap;
        self
    }

    /// Whether to split oversized paragraphs at sentence boundaries.
    /// Default: true.
    #[must_use]
    pub const fn respect_sentences(mut self, respect: bool) -> Self {
        self.options.respect_sentences = respect;
        self
    }

    /// Whether to accumulate whole paragraphs. Default: true.
    #[must_use]
    pub const fn respect_paragraphs(mut self, respect: bool) -> Self {
        self.options.respect_paragraphs = respect;
        self
    }

    /// Build the chunker.
    #[must_use]
    pub const fn build(self) -> TextChunker {
        TextChunker::new(self.options)
    }
}

impl Default for TextChunkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let chunker = TextChunker::default();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("  \n\n  ").is_empty());
    }

    #[test]
    fn test_single_small_paragraph_is_one_chunk() {
        let chunker = TextChunker::default();
        let chunks = chunker.chunk("Een korte alinea over daglicht.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].start_char, 0);
        assert_eq!(chunks[0].text, "Een korte alinea over daglicht.");
    }

    #[test]
    fn test_indices_strictly_increasing() {
        let chunker = TextChunker::builder().max_tokens(10).overlap_tokens(0).build();
        let text = "Alinea een met wat tekst erin.\n\nAlinea twee met wat tekst.\n\nAlinea drie met nog meer tekst erin.";
        let chunks = chunker.chunk(text);
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_oversized_sentence_becomes_single_chunk() {
        let chunker = TextChunker::builder().max_tokens(5).overlap_tokens(2).build();
        let text = "Een enkele zin die ruim boven het maximum van vijf tokens uitkomt zonder zinsgrens";
        let chunks = chunker.chunk(text);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].token_count > 5);
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn test_token_counts_match_text() {
        let chunker = TextChunker::builder().max_tokens(20).build();
        let text = "Eerste zin hier. Tweede zin daar.\n\nDerde zin in een nieuwe alinea. Vierde zin sluit af.";
        for chunk in chunker.chunk(text) {
            assert_eq!(chunk.token_count, lexdoc_core::TokenCounter::estimate(&chunk.text));
        }
    }

    #[test]
    fn test_chunk_pages_renumbers_and_skips_empty() {
        let chunker = TextChunker::default();
        let pages = vec![
            "Tekst van pagina een.".to_string(),
            "   ".to_string(),
            "Tekst van pagina drie.".to_string(),
        ];
        let chunks = chunker.chunk_pages(&pages);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].page_number, Some(1));
        assert_eq!(chunks[1].page_number, Some(3));
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[1].index, 1);
    }
}
