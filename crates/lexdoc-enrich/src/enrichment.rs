//! Table enrichment orchestration.
//!
//! For each parsed table, asks a language model for one natural-language
//! sentence per data row so tabular data becomes retrievable via semantic
//! search. Any failure (network, parse, empty response) degrades to a
//! deterministic sentence template; this path never errors. Many tables
//! are processed in fixed-size concurrent batches with a pause between
//! batches to respect external rate limits.

use crate::client::TextGenerator;
use futures::future::join_all;
use lexdoc_core::{EnrichedTable, ParsedTable};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Tables enriched concurrently per batch.
const DEFAULT_BATCH_SIZE: usize = 5;
/// Pause between batches.
const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(500);
/// Model output lines shorter than this are artifacts, not sentences.
const MIN_SENTENCE_LEN: usize = 15;

/// Leading enumeration markers in model output ("1. ", "- ", "* ").
static ENUMERATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s*").expect("valid regex"));

/// Batched, fallback-safe table enricher.
pub struct TableEnricher {
    generator: Arc<dyn TextGenerator>,
    batch_size: usize,
    batch_delay: Duration,
}

impl TableEnricher {
    /// Create an enricher with default batching.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }

    /// Override batch size and inter-batch delay.
    #[must_use]
    pub fn with_batching(mut self, batch_size: usize, batch_delay: Duration) -> Self {
        self.batch_size = batch_size.max(1);
        self.batch_delay = batch_delay;
        self
    }

    /// Enrich a single table. Never fails: on any model failure the
    /// deterministic fallback sentences are used and the result is
    /// marked degraded.
    pub async fn enrich_table(&self, table: &ParsedTable) -> EnrichedTable {
        let markdown = table.to_markdown();
        let structured_data = table.structured_data();

        let (synthetic_sentences, degraded) = match self
            .generator
            .generate(SYSTEM_PROMPT, &row_sentence_prompt(table, &markdown), 0.2)
            .await
        {
            Ok(response) => {
                let sentences = parse_sentences(&response);
                if sentences.is_empty() {
                    warn!(table = %table.display_name(), "model returned no usable sentences, using fallback");
                    (fallback_sentences(table), true)
                } else {
                    debug!(
                        table = %table.display_name(),
                        sentences = sentences.len(),
                        rows = table.data_rows.len(),
                        "table enriched"
                    );
                    (sentences, false)
                }
            }
            Err(err) => {
                warn!(table = %table.display_name(), error = %err, "enrichment failed, using fallback");
                (fallback_sentences(table), true)
            }
        };

        EnrichedTable {
            table: table.clone(),
            synthetic_sentences,
            structured_data,
            markdown,
            degraded,
        }
    }

    /// Enrich many tables with bounded concurrency.
    ///
    /// Failures are isolated per table; one table's fallback never
    /// cancels sibling tables in the same batch.
    pub async fn enrich_tables(&self, tables: &[ParsedTable]) -> Vec<EnrichedTable> {
        let mut enriched = Vec::with_capacity(tables.len());
        let mut batches = tables.chunks(self.batch_size).peekable();
        while let Some(batch) = batches.next() {
            let results = join_all(batch.iter().map(|t| self.enrich_table(t))).await;
            enriched.extend(results);
            if batches.peek().is_some() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }
        enriched
    }
}

const SYSTEM_PROMPT: &str = "You convert tables from Dutch building \
regulations into natural-language sentences for semantic search. Answer \
with plain sentences only, no markdown.";

fn row_sentence_prompt(table: &ParsedTable, markdown: &str) -> String {
    format!(
        "Write exactly one sentence per data row of the table below ({} \
rows). Each sentence must name the row's category or function, the table \
identifier ({}), and the quantities with their units. One sentence per \
line, no numbering.\n\n{markdown}",
        table.data_rows.len(),
        table.display_name(),
    )
}

/// Split a model response into discrete sentences: strip enumeration
/// markers, reject markdown artifacts and drop lines too short to be a
/// sentence.
fn parse_sentences(response: &str) -> Vec<String> {
    response
        .lines()
        .map(|line| ENUMERATION_RE.replace(line.trim(), "").into_owned())
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with('|')
                && !line.starts_with('#')
                && !line.starts_with("```")
                && line.len() >= MIN_SENTENCE_LEN
        })
        .collect()
}

/// Deterministic fallback: one sentence per non-empty data row naming
/// the table and the row's cell values; a single summary sentence when
/// the table has no non-empty rows.
fn fallback_sentences(table: &ParsedTable) -> Vec<String> {
    let name = table.display_name();
    let sentences: Vec<String> = table
        .data_rows
        .iter()
        .filter(|row| !row.is_empty())
        .enumerate()
        .map(|(i, row)| {
            let values: Vec<&str> = row
                .cells
                .iter()
                .map(|c| c.value.trim())
                .filter(|v| !v.is_empty())
                .collect();
            format!("{name}, rij {}: {}.", i + 1, values.join(", "))
        })
        .collect();

    if sentences.is_empty() {
        vec![format!(
            "{name} met {} kolommen en {} rijen.",
            table.metadata.total_columns, table.metadata.total_rows
        )]
    } else {
        sentences
    }
}
