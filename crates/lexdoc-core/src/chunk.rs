//! Chunk data model.
//!
//! A chunk is a token-bounded contiguous span of extracted text, the
//! atomic unit handed to the embedding/retrieval collaborator. Chunks are
//! produced in document order, carry a strictly increasing `index` and are
//! immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A token-bounded span of extracted text with positional metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    /// Chunk content, possibly prefixed with a sentence-boundary overlap
    /// tail from the preceding chunk.
    pub text: String,
    /// Sequence position, 0-based, unique within a document.
    pub index: usize,
    /// Token count of `text` under the fixed tokenization scheme.
    pub token_count: usize,
    /// Char offset of the chunk's core content in its source text.
    pub start_char: usize,
    /// Char offset one past the chunk's core content in its source text.
    pub end_char: usize,
    /// 1-based page number for paginated sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
    /// Title of the enclosing section, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
}

/// A chunk assembled from legal-document structure, extending [`TextChunk`]
/// with structural metadata recomputed from the chunk's own text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalChunk {
    /// The underlying chunk.
    #[serde(flatten)]
    pub chunk: TextChunk,
    /// Article identifiers whose text is contained in this chunk.
    pub article_numbers: Vec<String>,
    /// Table identifiers whose content is contained in this chunk.
    pub table_names: Vec<String>,
    /// Title of the most recently seen section, as ambient context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_section: Option<String>,
    /// Whether the chunk carries table content.
    pub has_table: bool,
    /// Whether the chunk references other articles/tables than its own.
    pub has_cross_reference: bool,
    /// Hierarchy depth of the element that seeded this chunk.
    pub structure_level: usize,
}

/// A chunk of either kind, as carried by a [`ProcessedDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentChunk {
    /// Structure-aware chunk from the legal-XML path.
    Legal(LegalChunk),
    /// Plain chunk from the token-aware chunker.
    Plain(TextChunk),
}

impl DocumentChunk {
    /// Chunk text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Legal(c) => &c.chunk.text,
            Self::Plain(c) => &c.text,
        }
    }

    /// Token count of the chunk text.
    #[must_use]
    pub fn token_count(&self) -> usize {
        match self {
            Self::Legal(c) => c.chunk.token_count,
            Self::Plain(c) => c.token_count,
        }
    }

    /// Sequence position within the document.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Legal(c) => c.chunk.index,
            Self::Plain(c) => c.index,
        }
    }

    /// The underlying [`TextChunk`].
    #[must_use]
    pub fn as_text_chunk(&self) -> &TextChunk {
        match self {
            Self::Legal(c) => &c.chunk,
            Self::Plain(c) => c,
        }
    }
}

/// Aggregate statistics attached to a processed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Page count for paginated sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    /// Sum of token counts over all chunks.
    pub total_tokens: usize,
    /// Number of chunks, always equal to `chunks.len()`.
    pub chunk_count: usize,
    /// Which extraction strategy produced the text.
    pub extraction_method: String,
    /// Heuristic quality warnings collected during extraction.
    pub warnings: Vec<String>,
    /// True when any fallback path fired (e.g. template sentences were
    /// used instead of model enrichment), so retrieval-quality
    /// expectations can be adjusted.
    pub degraded: bool,
}

/// Terminal artifact of the ingestion pipeline, handed to the
/// embedding/storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    /// Caller-assigned document id.
    pub file_id: String,
    /// Original filename, used in user-facing error reports.
    pub filename: String,
    /// Chunks in document order.
    pub chunks: Vec<DocumentChunk>,
    /// Aggregate statistics.
    pub stats: ProcessingStats,
}

/// Document-level profile generated by sampling a bounded subset of
/// chunks; consumed by downstream query classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Short natural-language summary of the document.
    pub summary: String,
    /// Main topics covered.
    pub topics: Vec<String>,
    /// Coarse document type (e.g. "regulation", "report").
    pub document_type: String,
    /// Salient domain concepts.
    pub key_concepts: Vec<String>,
    /// Detected language code.
    pub language: String,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunk(index: usize) -> TextChunk {
        TextChunk {
            text: "Artikel 1.1 Begripsbepalingen.".to_string(),
            index,
            token_count: 8,
            start_char: 0,
            end_char: 30,
            page_number: None,
            section_title: None,
        }
    }

    #[test]
    fn test_document_chunk_accessors() {
        let plain = DocumentChunk::Plain(sample_chunk(3));
        assert_eq!(plain.index(), 3);
        assert_eq!(plain.token_count(), 8);
        assert!(plain.text().starts_with("Artikel"));
    }

    #[test]
    fn test_legal_chunk_serializes_flat() {
        let legal = LegalChunk {
            chunk: sample_chunk(0),
            article_numbers: vec!["1.1".to_string()],
            table_names: vec![],
            parent_section: None,
            has_table: false,
            has_cross_reference: false,
            structure_level: 2,
        };
        let json = serde_json::to_value(&legal).unwrap();
        // Flattened: chunk fields sit next to the structural metadata
        assert_eq!(json["index"], 0);
        assert_eq!(json["article_numbers"][0], "1.1");
    }
}
