//! # lexdoc-structure
//!
//! Structure parsing for Dutch legal documents and structure-aware chunk
//! assembly:
//!
//! - [`parser`]: hoofdstuk/afdeling/paragraaf/artikel/tabel parsing with
//!   cross-reference detection and article-to-table association
//! - [`table`]: normalization of tabular XML markup into
//!   [`lexdoc_core::ParsedTable`]s
//! - [`assembler`]: merging articles with their enriched tables into
//!   token-bounded [`lexdoc_core::LegalChunk`]s

pub mod assembler;
pub mod parser;
pub mod table;

pub use assembler::{AssemblerOptions, ChunkAssembler};
pub use parser::{detect_cross_references, find_associated_table, parse_structure};
pub use table::parse_tables;
