//! # lexdoc-backend
//!
//! Format detection and per-format extraction backends. Every backend
//! produces an [`ExtractionResult`]; only the legal-XML backend
//! pre-chunks, all other formats hand plain text to the token-aware
//! chunker downstream.

pub mod csv;
pub mod format;
pub mod image;
pub mod legal_xml;
pub mod pdf;
pub mod router;

pub use format::SourceFormat;
pub use router::ExtractorRouter;

use lexdoc_core::LegalChunk;

/// Output of a format backend.
#[derive(Debug, Default)]
pub struct ExtractionResult {
    /// Extracted text, empty only for empty inputs.
    pub text: String,
    /// Per-page text for paginated sources with more than one page.
    pub pages: Option<Vec<String>>,
    /// Page count for paginated sources.
    pub page_count: Option<usize>,
    /// Data row count for tabular sources.
    pub rows: Option<usize>,
    /// Column count for tabular sources.
    pub columns: Option<usize>,
    /// Which extraction strategy produced the text.
    pub extraction_method: String,
    /// Heuristic quality warnings.
    pub warnings: Vec<String>,
    /// Structure-aware chunks, set only by the legal-XML backend when
    /// structure was found. When set, the plain chunker is skipped.
    pub prechunked: Option<Vec<LegalChunk>>,
    /// True when a fallback fired during extraction or enrichment.
    pub degraded: bool,
}
