//! Source format detection.
//!
//! Detection is mime-first with an extension fallback, so a misnamed
//! file with a correct content type still routes to the right extractor.

use std::fmt;
use std::path::Path;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Plain UTF-8 text.
    PlainText,
    /// Markdown, chunked as plain text.
    Markdown,
    /// Dutch legal XML (Bouwbesluit-style markup).
    LegalXml,
    /// PDF document.
    Pdf,
    /// Comma/semicolon/tab-separated values.
    Csv,
    /// Raster image, described by a vision model.
    Image,
}

impl SourceFormat {
    /// Detect the format from a declared media type and filename.
    ///
    /// Returns `None` when neither identifies a supported format.
    #[must_use]
    pub fn detect(mime: &str, filename: &str) -> Option<Self> {
        let mime = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "text/plain" => return Some(Self::PlainText),
            "text/markdown" => return Some(Self::Markdown),
            "application/xml" | "text/xml" => return Some(Self::LegalXml),
            "application/pdf" => return Some(Self::Pdf),
            "text/csv" | "application/csv" => return Some(Self::Csv),
            "image/png" | "image/jpeg" | "image/webp" | "image/gif" => return Some(Self::Image),
            _ => {}
        }

        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("txt") => Some(Self::PlainText),
            Some("md" | "markdown") => Some(Self::Markdown),
            Some("xml") => Some(Self::LegalXml),
            Some("pdf") => Some(Self::Pdf),
            Some("csv") => Some(Self::Csv),
            Some("png" | "jpg" | "jpeg" | "webp" | "gif") => Some(Self::Image),
            _ => None,
        }
    }

    /// Human-readable list of supported formats, for error messages.
    #[must_use]
    pub const fn supported_list() -> &'static str {
        "txt, md, xml, pdf, csv, png, jpg, jpeg, webp, gif"
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlainText => "plain text",
            Self::Markdown => "markdown",
            Self::LegalXml => "legal XML",
            Self::Pdf => "PDF",
            Self::Csv => "CSV",
            Self::Image => "image",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_takes_precedence_over_extension() {
        assert_eq!(
            SourceFormat::detect("application/pdf", "misnamed.txt"),
            Some(SourceFormat::Pdf)
        );
    }

    #[test]
    fn test_extension_fallback_for_generic_mime() {
        assert_eq!(
            SourceFormat::detect("application/octet-stream", "besluit.xml"),
            Some(SourceFormat::LegalXml)
        );
        assert_eq!(
            SourceFormat::detect("", "notes.MD"),
            Some(SourceFormat::Markdown)
        );
    }

    #[test]
    fn test_mime_parameters_stripped() {
        assert_eq!(
            SourceFormat::detect("text/csv; charset=utf-8", "data.bin"),
            Some(SourceFormat::Csv)
        );
    }

    #[test]
    fn test_unknown_format_is_none() {
        assert_eq!(SourceFormat::detect("application/zip", "archive.zip"), None);
    }
}
