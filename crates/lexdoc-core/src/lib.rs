//! # lexdoc-core
//!
//! Shared data model, error taxonomy and token counting for the lexdoc
//! document ingestion pipeline.
//!
//! The pipeline turns heterogeneous documents (plain text, PDF, legal
//! XML, CSV, images) into retrieval-ready, token-bounded chunks carrying
//! structural metadata. This crate holds the types every stage agrees on:
//!
//! - [`TextChunk`] / [`LegalChunk`] / [`ProcessedDocument`]: the chunk
//!   model and the terminal pipeline artifact
//! - [`LegalStructureElement`]: parsed legal-document structure
//! - [`ParsedTable`] / [`EnrichedTable`]: the normalized table model
//! - [`TokenCounter`]: the single token-estimation function all budgets
//!   route through
//! - [`LexdocError`]: the error taxonomy

pub mod chunk;
pub mod error;
pub mod structure;
pub mod table;
pub mod token_counter;

pub use chunk::{
    DocumentChunk, DocumentMetadata, LegalChunk, ProcessedDocument, ProcessingStats, TextChunk,
};
pub use error::{LexdocError, Result};
pub use structure::{CrossReferences, ElementType, LegalStructureElement};
pub use table::{EnrichedTable, ParsedTable, TableCell, TableMetadata, TableRow};
pub use token_counter::TokenCounter;
