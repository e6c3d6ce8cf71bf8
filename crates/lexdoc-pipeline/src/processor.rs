//! Document processing orchestration.
//!
//! Ties the stages together: fetch bytes from the store, extract text
//! through the format router, chunk (unless the backend pre-chunked),
//! aggregate statistics. Every failure on this path is wrapped into a
//! document-level error carrying the filename; only the unsupported
//! format condition passes through unchanged.

use lexdoc_backend::{ExtractionResult, ExtractorRouter, SourceFormat};
use lexdoc_chunker::TextChunker;
use lexdoc_core::{
    DocumentChunk, DocumentMetadata, LexdocError, ProcessedDocument, ProcessingStats, Result,
    TokenCounter,
};
use lexdoc_enrich::MetadataGenerator;
use std::sync::Arc;
use tracing::info;

use crate::store::ByteStore;

/// Nominal token estimate for images, whose text is only known after a
/// vision call.
const IMAGE_TOKEN_ESTIMATE: usize = 500;

/// Pre-processing cost estimate.
#[derive(Debug, Clone)]
pub struct CostEstimate {
    /// Estimated token volume of the extractable text.
    pub total_tokens: usize,
    /// Estimated chunk count under the configured chunk options.
    pub estimated_chunks: usize,
    /// Page count for paginated sources.
    pub page_count: Option<usize>,
    /// Which extraction strategy the estimate is based on.
    pub extraction_method: String,
}

/// End-to-end document processor.
pub struct DocumentProcessor {
    store: Arc<dyn ByteStore>,
    router: ExtractorRouter,
    chunker: TextChunker,
    metadata: MetadataGenerator,
}

impl DocumentProcessor {
    /// Assemble a processor from its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn ByteStore>,
        router: ExtractorRouter,
        chunker: TextChunker,
        metadata: MetadataGenerator,
    ) -> Self {
        Self {
            store,
            router,
            chunker,
            metadata,
        }
    }

    /// Process a stored document into chunks and statistics.
    ///
    /// # Errors
    ///
    /// Returns [`LexdocError::UnsupportedFormat`] for unknown formats and
    /// [`LexdocError::ProcessingFailed`] (carrying `filename`) for every
    /// other failure on the fetch/extract/chunk path.
    pub async fn process_file(
        &self,
        file_id: &str,
        file_path: &str,
        filename: &str,
        mime: &str,
    ) -> Result<ProcessedDocument> {
        let result = self
            .run_pipeline(file_id, file_path, filename, mime)
            .await
            .map_err(|e| e.into_processing_failure(filename));
        if let Ok(doc) = &result {
            info!(
                file_id,
                filename,
                chunks = doc.stats.chunk_count,
                tokens = doc.stats.total_tokens,
                method = %doc.stats.extraction_method,
                degraded = doc.stats.degraded,
                "document processed"
            );
        }
        result
    }

    async fn run_pipeline(
        &self,
        file_id: &str,
        file_path: &str,
        filename: &str,
        mime: &str,
    ) -> Result<ProcessedDocument> {
        let bytes = self.store.get_file_buffer(file_path).await?;
        let extraction = self.router.extract(&bytes, mime, filename).await?;

        let chunks = self.chunk_extraction(&extraction);
        let total_tokens = chunks.iter().map(DocumentChunk::token_count).sum();

        let stats = ProcessingStats {
            page_count: extraction.page_count,
            total_tokens,
            chunk_count: chunks.len(),
            extraction_method: extraction.extraction_method,
            warnings: extraction.warnings,
            degraded: extraction.degraded,
        };

        Ok(ProcessedDocument {
            file_id: file_id.to_string(),
            filename: filename.to_string(),
            chunks,
            stats,
        })
    }

    /// Turn an extraction result into document chunks: pre-chunked output
    /// is taken as-is, paginated text is chunked page by page, everything
    /// else goes through the plain chunker.
    fn chunk_extraction(&self, extraction: &ExtractionResult) -> Vec<DocumentChunk> {
        if let Some(prechunked) = &extraction.prechunked {
            return prechunked
                .iter()
                .cloned()
                .map(DocumentChunk::Legal)
                .collect();
        }
        let chunks = match &extraction.pages {
            Some(pages) => self.chunker.chunk_pages(pages),
            None => self.chunker.chunk(&extraction.text),
        };
        chunks.into_iter().map(DocumentChunk::Plain).collect()
    }

    /// Estimate token volume and chunk count before committing to a full
    /// processing run. Model-backed stages (enrichment, vision) are not
    /// exercised; legal XML is estimated on its raw text and images get a
    /// nominal figure.
    ///
    /// # Errors
    ///
    /// Returns the same fetch and format errors as [`Self::process_file`],
    /// wrapped per document.
    pub async fn estimate_processing_cost(
        &self,
        file_path: &str,
        filename: &str,
        mime: &str,
    ) -> Result<CostEstimate> {
        let estimate = self
            .run_estimate(file_path, filename, mime)
            .await
            .map_err(|e| e.into_processing_failure(filename))?;
        Ok(estimate)
    }

    async fn run_estimate(
        &self,
        file_path: &str,
        filename: &str,
        mime: &str,
    ) -> Result<CostEstimate> {
        let format = SourceFormat::detect(mime, filename).ok_or_else(|| {
            LexdocError::UnsupportedFormat {
                mime: mime.to_string(),
                filename: filename.to_string(),
                supported: SourceFormat::supported_list().to_string(),
            }
        })?;
        let bytes = self.store.get_file_buffer(file_path).await?;

        let (total_tokens, page_count, extraction_method) = match format {
            SourceFormat::Image => (IMAGE_TOKEN_ESTIMATE, None, "vision-description".to_string()),
            SourceFormat::Pdf => {
                let extraction = lexdoc_backend::pdf::extract(&bytes)?;
                (
                    TokenCounter::estimate(&extraction.text),
                    extraction.page_count,
                    extraction.extraction_method,
                )
            }
            SourceFormat::Csv => {
                let extraction = lexdoc_backend::csv::extract(&bytes)?;
                (
                    TokenCounter::estimate(&extraction.text),
                    None,
                    extraction.extraction_method,
                )
            }
            SourceFormat::LegalXml => {
                let text = String::from_utf8_lossy(&bytes);
                (
                    TokenCounter::estimate(&text),
                    None,
                    "legal-structure".to_string(),
                )
            }
            SourceFormat::PlainText | SourceFormat::Markdown => {
                let text = String::from_utf8_lossy(&bytes);
                (
                    TokenCounter::estimate(&text),
                    None,
                    "text-passthrough".to_string(),
                )
            }
        };

        let options = self.chunker.options();
        let effective = options.max_tokens.saturating_sub(options.overlap_tokens).max(1);
        let estimated_chunks = if total_tokens == 0 {
            0
        } else {
            total_tokens.div_ceil(effective)
        };

        Ok(CostEstimate {
            total_tokens,
            estimated_chunks,
            page_count,
            extraction_method,
        })
    }

    /// Generate a document-level profile from an already processed
    /// document. Never fails; see [`MetadataGenerator::generate`].
    pub async fn generate_metadata(&self, document: &ProcessedDocument) -> DocumentMetadata {
        self.metadata
            .generate(&document.filename, &document.chunks)
            .await
    }
}
