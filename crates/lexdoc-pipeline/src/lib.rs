//! # lexdoc-pipeline
//!
//! Orchestration layer: a [`DocumentProcessor`] fetches bytes from a
//! [`ByteStore`], routes them through the format backends, chunks the
//! extracted text and reports aggregate statistics and cost estimates.

pub mod processor;
pub mod store;

pub use processor::{CostEstimate, DocumentProcessor};
pub use store::{ByteStore, FsStore};
