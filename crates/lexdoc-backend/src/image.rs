//! Image extraction through a vision model.
//!
//! The descriptive text is what gets chunked and embedded; the image
//! itself is never stored by this pipeline.

use lexdoc_core::Result;
use lexdoc_enrich::VisionDescriber;

use crate::ExtractionResult;

const INSTRUCTIONS: &str = "Describe this image in detail for a document \
retrieval system. Cover the subject, any visible text and labels \
(transcribed verbatim), technical annotations such as dimensions, \
tolerances and reference numbers, and the overall layout of the image. \
Answer in the language of the visible text when there is any.";

/// Describe an image and return the description as extractable text.
pub async fn extract(
    vision: &dyn VisionDescriber,
    bytes: &[u8],
    filename: &str,
) -> Result<ExtractionResult> {
    let description = vision.describe_image(bytes, INSTRUCTIONS).await?;
    Ok(ExtractionResult {
        text: format!("Image: {filename}\n\n{}", description.trim()),
        extraction_method: "vision-description".to_string(),
        ..ExtractionResult::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lexdoc_core::LexdocError;

    struct FixedDescriber(Option<String>);

    #[async_trait]
    impl VisionDescriber for FixedDescriber {
        async fn describe_image(&self, _image: &[u8], _instructions: &str) -> Result<String> {
            self.0
                .clone()
                .ok_or_else(|| LexdocError::Model("vision unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_description_prefixed_with_filename() {
        let describer = FixedDescriber(Some("Een plattegrond met maatvoering.".to_string()));
        let result = extract(&describer, b"png-bytes", "plattegrond.png").await.unwrap();
        assert!(result.text.starts_with("Image: plattegrond.png\n\n"));
        assert!(result.text.contains("plattegrond met maatvoering"));
        assert_eq!(result.extraction_method, "vision-description");
    }

    #[tokio::test]
    async fn test_vision_failure_propagates() {
        let describer = FixedDescriber(None);
        let result = extract(&describer, b"png-bytes", "plattegrond.png").await;
        assert!(matches!(result, Err(LexdocError::Model(_))));
    }

    /// Fails the request unless the instructions ask for everything the
    /// description must cover.
    struct InstructionChecker;

    #[async_trait]
    impl VisionDescriber for InstructionChecker {
        async fn describe_image(&self, _image: &[u8], instructions: &str) -> Result<String> {
            for needed in ["subject", "text", "labels", "annotations", "layout"] {
                assert!(
                    instructions.contains(needed),
                    "instructions do not ask for {needed}"
                );
            }
            Ok("ok".to_string())
        }
    }

    #[tokio::test]
    async fn test_instructions_cover_annotations_and_layout() {
        extract(&InstructionChecker, b"png-bytes", "schema.png")
            .await
            .unwrap();
    }
}
