//! Error types for document ingestion operations.
//!
//! One taxonomy covers the whole pipeline: unsupported input formats,
//! extraction failures, storage misses and the document-level wrapper
//! used by the processor. Recoverable conditions (a malformed table, a
//! failed enrichment call) are handled in place and never surface here.

use thiserror::Error;

/// Error types that can occur during document ingestion.
#[derive(Error, Debug)]
pub enum LexdocError {
    /// The declared media type / extension is not in the supported set.
    ///
    /// Not retryable: the user has to convert or re-upload the file.
    #[error("unsupported format {mime:?} for {filename:?}; supported: {supported}")]
    UnsupportedFormat {
        /// Declared media type of the rejected input.
        mime: String,
        /// Filename of the rejected input.
        filename: String,
        /// Human-readable list of supported formats.
        supported: String,
    },

    /// The source bytes could not be turned into text at all
    /// (corrupt, password-protected or malformed input).
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    /// The byte store has no object at the requested path.
    #[error("file not found: {0}")]
    NotFound(String),

    /// Document-level wrapper: any unexpected failure during
    /// fetch/extract/chunk, carrying the filename for user-facing reports.
    #[error("processing {filename:?} failed: {message}")]
    ProcessingFailed {
        /// Filename of the document that failed.
        filename: String,
        /// Human-readable cause from the underlying stage.
        message: String,
    },

    /// A language/vision model request failed.
    #[error("model request failed: {0}")]
    Model(String),

    /// The document-level XML could not be parsed.
    #[error("XML error: {0}")]
    Xml(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LexdocError {
    /// Wrap any error into the document-level `ProcessingFailed` condition.
    ///
    /// `UnsupportedFormat` is passed through unchanged: it requires a
    /// different user action (convert/re-upload) than a pipeline failure.
    #[must_use]
    pub fn into_processing_failure(self, filename: &str) -> Self {
        match self {
            Self::UnsupportedFormat { .. } => self,
            other => Self::ProcessingFailed {
                filename: filename.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Type alias for [`Result<T, LexdocError>`].
pub type Result<T> = std::result::Result<T, LexdocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_display() {
        let error = LexdocError::UnsupportedFormat {
            mime: "application/zip".to_string(),
            filename: "archive.zip".to_string(),
            supported: "txt, md, xml, pdf, csv, png, jpg".to_string(),
        };
        let display = format!("{error}");
        assert!(display.contains("application/zip"));
        assert!(display.contains("supported"));
    }

    #[test]
    fn test_processing_failed_carries_filename() {
        let error = LexdocError::ExtractionFailed("empty page tree".to_string())
            .into_processing_failure("besluit.pdf");
        let display = format!("{error}");
        assert!(display.contains("besluit.pdf"));
        assert!(display.contains("empty page tree"));
    }

    #[test]
    fn test_unsupported_format_not_rewrapped() {
        let error = LexdocError::UnsupportedFormat {
            mime: "application/zip".to_string(),
            filename: "a.zip".to_string(),
            supported: "txt".to_string(),
        }
        .into_processing_failure("a.zip");
        assert!(matches!(error, LexdocError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: LexdocError = io.into();
        assert!(matches!(error, LexdocError::Io(_)));
    }
}
