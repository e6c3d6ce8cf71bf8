//! Model-backed enrichment: table sentence generation and document
//! profiling, plus the clients behind them.
//!
//! Everything here is fallback-safe: a model outage degrades output
//! quality but never fails document processing.

pub mod client;
pub mod enrichment;
pub mod metadata;
pub mod openai;

pub use client::{TextGenerator, VisionDescriber};
pub use enrichment::TableEnricher;
pub use metadata::MetadataGenerator;
pub use openai::OpenAiClient;
