//! Format-based extractor dispatch.

use lexdoc_core::{LexdocError, Result};
use lexdoc_enrich::{TableEnricher, TextGenerator, VisionDescriber};
use std::sync::Arc;
use tracing::debug;

use crate::format::SourceFormat;
use crate::{csv, image, legal_xml, pdf, ExtractionResult};

/// Routes raw bytes to the extractor for their detected format.
pub struct ExtractorRouter {
    vision: Arc<dyn VisionDescriber>,
    enricher: TableEnricher,
}

impl ExtractorRouter {
    /// Create a router. The text generator backs table enrichment on the
    /// legal-XML path; the vision model backs image description.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, vision: Arc<dyn VisionDescriber>) -> Self {
        Self {
            vision,
            enricher: TableEnricher::new(generator),
        }
    }

    /// Detect the input format and extract text.
    ///
    /// # Errors
    ///
    /// Returns [`LexdocError::UnsupportedFormat`] when neither media type
    /// nor extension identifies a supported format, or the per-format
    /// extraction error otherwise.
    pub async fn extract(
        &self,
        bytes: &[u8],
        mime: &str,
        filename: &str,
    ) -> Result<ExtractionResult> {
        let Some(format) = SourceFormat::detect(mime, filename) else {
            return Err(LexdocError::UnsupportedFormat {
                mime: mime.to_string(),
                filename: filename.to_string(),
                supported: SourceFormat::supported_list().to_string(),
            });
        };
        debug!(%format, filename, "extracting");

        match format {
            SourceFormat::PlainText | SourceFormat::Markdown => Ok(ExtractionResult {
                text: String::from_utf8_lossy(bytes).into_owned(),
                extraction_method: "text-passthrough".to_string(),
                ..ExtractionResult::default()
            }),
            SourceFormat::LegalXml => legal_xml::extract(&self.enricher, bytes).await,
            SourceFormat::Pdf => pdf::extract(bytes),
            SourceFormat::Csv => csv::extract(bytes),
            SourceFormat::Image => image::extract(self.vision.as_ref(), bytes, filename).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubModel;

    #[async_trait]
    impl TextGenerator for StubModel {
        async fn generate(
            &self,
            _system: &str,
            _user: &str,
            _temperature: f32,
        ) -> Result<String> {
            Ok("De rij bevat een waarde voor de gebruiksfunctie.".to_string())
        }
    }

    #[async_trait]
    impl VisionDescriber for StubModel {
        async fn describe_image(&self, _image: &[u8], _instructions: &str) -> Result<String> {
            Ok("Een schema.".to_string())
        }
    }

    fn router() -> ExtractorRouter {
        ExtractorRouter::new(Arc::new(StubModel), Arc::new(StubModel))
    }

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let result = router()
            .extract(b"Gewone tekst.", "text/plain", "notitie.txt")
            .await
            .unwrap();
        assert_eq!(result.text, "Gewone tekst.");
        assert_eq!(result.extraction_method, "text-passthrough");
        assert!(result.prechunked.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_format_names_supported_set() {
        let err = router()
            .extract(b"PK", "application/zip", "archief.zip")
            .await
            .unwrap_err();
        match err {
            LexdocError::UnsupportedFormat { mime, filename, supported } => {
                assert_eq!(mime, "application/zip");
                assert_eq!(filename, "archief.zip");
                assert!(supported.contains("pdf"));
            }
            other => panic!("expected UnsupportedFormat, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_csv_routes_by_extension() {
        let result = router()
            .extract(b"name,age\nAnna,30\n", "application/octet-stream", "people.csv")
            .await
            .unwrap();
        assert_eq!(result.extraction_method, "csv-sentences");
    }

    #[tokio::test]
    async fn test_image_routes_to_vision() {
        let result = router()
            .extract(b"png-bytes", "image/png", "schema.png")
            .await
            .unwrap();
        assert!(result.text.starts_with("Image: schema.png"));
    }
}
