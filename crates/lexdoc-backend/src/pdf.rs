//! PDF text extraction.
//!
//! Extracts embedded text and attaches heuristic quality warnings for
//! documents that are likely scans or have broken text layers. Pages are
//! preserved when the extractor emits form feeds between them.

use lexdoc_core::{LexdocError, Result};
use tracing::debug;

use crate::ExtractionResult;

/// Whitespace share above which the text layer looks broken.
const WHITESPACE_RATIO_CEILING: f64 = 0.35;
/// Pages averaging fewer characters than this are likely scanned.
const MIN_CHARS_PER_PAGE: usize = 200;

/// Extract the text layer of a PDF.
pub fn extract(bytes: &[u8]) -> Result<ExtractionResult> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| LexdocError::ExtractionFailed(format!("PDF text extraction failed: {e}")))?;
    from_raw_text(&raw)
}

/// Build the extraction result from the raw text layer. Pages are always
/// populated, even for single-page documents, so chunk `page_number`
/// metadata is uniform across paginated sources.
fn from_raw_text(raw: &str) -> Result<ExtractionResult> {
    // The extractor separates pages with form feeds when it can.
    let pages: Vec<String> = raw
        .split('\u{c}')
        .map(|p| p.trim().to_string())
        .collect();
    let page_count = pages.len();
    let text = pages.join("\n\n");

    if text.trim().is_empty() {
        return Err(LexdocError::ExtractionFailed(
            "PDF contains no extractable text (likely a scan)".to_string(),
        ));
    }

    let warnings = quality_warnings(&text, page_count);
    debug!(page_count, warnings = warnings.len(), "pdf text extracted");

    Ok(ExtractionResult {
        text,
        pages: Some(pages),
        page_count: Some(page_count),
        extraction_method: "pdf-text".to_string(),
        warnings,
        ..ExtractionResult::default()
    })
}

/// Heuristics for a degraded text layer.
fn quality_warnings(text: &str, page_count: usize) -> Vec<String> {
    let mut warnings = Vec::new();

    let total = text.chars().count();
    if total > 0 {
        #[allow(clippy::cast_precision_loss)]
        let whitespace_ratio =
            text.chars().filter(|c| c.is_whitespace()).count() as f64 / total as f64;
        if whitespace_ratio > WHITESPACE_RATIO_CEILING {
            warnings.push(format!(
                "high whitespace ratio ({whitespace_ratio:.2}); text layer may be fragmented"
            ));
        }
    }

    if page_count > 0 && total / page_count < MIN_CHARS_PER_PAGE {
        warnings.push(format!(
            "low text density ({} chars over {page_count} pages); document may be scanned",
            total
        ));
    }

    warnings
}
