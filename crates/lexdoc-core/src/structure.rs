//! Structural elements of a parsed legal document.

use serde::{Deserialize, Serialize};

/// Kind of a structural element in a Dutch legal document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Chapter.
    Hoofdstuk,
    /// Section.
    Afdeling,
    /// Sub-section.
    Paragraaf,
    /// Article.
    Artikel,
    /// Numbered clause within an article.
    Lid,
    /// Table block.
    Tabel,
    /// Free-standing text outside any marker.
    Text,
}

impl ElementType {
    /// Hierarchy depth: chapter = 0, section = 1, article = 2, table = 3.
    #[must_use]
    pub const fn level(self) -> usize {
        match self {
            Self::Hoofdstuk => 0,
            Self::Afdeling | Self::Paragraaf => 1,
            Self::Artikel | Self::Lid => 2,
            Self::Tabel | Self::Text => 3,
        }
    }

    /// Whether this element opens a higher-level boundary that undersized
    /// chunks must not be merged across.
    #[must_use]
    pub const fn is_boundary(self) -> bool {
        matches!(self, Self::Hoofdstuk | Self::Afdeling | Self::Paragraaf)
    }
}

/// A parsed fragment of a legal document with position and hierarchy depth.
///
/// Elements are ordered by `start_index` ascending within a document and
/// are read-only after the parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalStructureElement {
    /// Element kind.
    pub element_type: ElementType,
    /// Flattened text content; for tables, the raw XML slice so the table
    /// parser can re-parse it.
    pub content: String,
    /// Dotted numeric identifier (e.g. "4.162"), when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Byte offset of the element in the source document.
    pub start_index: usize,
    /// Byte offset one past the element in the source document.
    pub end_index: usize,
    /// Hierarchy depth, 0 = top of hierarchy.
    pub level: usize,
}

/// Cross-references to other articles/tables found in a text span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReferences {
    /// Whether any reference was found.
    pub has_references: bool,
    /// Referenced article identifiers, deduplicated, in order of first
    /// appearance.
    pub article_refs: Vec<String>,
    /// Referenced table identifiers, deduplicated, in order of first
    /// appearance.
    pub table_refs: Vec<String>,
}
