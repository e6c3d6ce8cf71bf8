//! CSV extraction.
//!
//! Renders tabular data as retrieval-friendly sentences: a summary line
//! naming the column set, then one "Row n: col: value, ..." sentence per
//! data row. The delimiter is sniffed from the header line.

use lexdoc_core::{LexdocError, Result};
use tracing::debug;

use crate::ExtractionResult;

/// Delimiter candidates, tried in order of likelihood.
const DELIMITERS: [u8; 5] = [b',', b';', b'\t', b'|', b':'];

/// Extract a CSV file into sentence-per-row text.
pub fn extract(bytes: &[u8]) -> Result<ExtractionResult> {
    let content = String::from_utf8_lossy(bytes);
    let delimiter = sniff_delimiter(&content);
    debug!(delimiter = %char::from(delimiter), "csv delimiter sniffed");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LexdocError::ExtractionFailed(format!("invalid CSV header: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(LexdocError::ExtractionFailed("empty CSV header".to_string()));
    }

    let mut sentences = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| LexdocError::ExtractionFailed(format!("invalid CSV row: {e}")))?;
        let pairs: Vec<String> = record
            .iter()
            .enumerate()
            .map(|(col, value)| {
                let name = headers
                    .get(col)
                    .map_or_else(|| format!("Column {}", col + 1), Clone::clone);
                format!("{name}: {}", value.trim())
            })
            .collect();
        sentences.push(format!("Row {}: {}.", i + 1, pairs.join(", ")));
    }

    let mut text = format!(
        "CSV file with {} rows and {} columns: {}.",
        sentences.len(),
        headers.len(),
        headers.join(", ")
    );
    for sentence in &sentences {
        text.push('\n');
        text.push_str(sentence);
    }

    Ok(ExtractionResult {
        text,
        rows: Some(sentences.len()),
        columns: Some(headers.len()),
        extraction_method: "csv-sentences".to_string(),
        ..ExtractionResult::default()
    })
}

/// Pick the candidate delimiter occurring most often in the header line.
/// Defaults to comma.
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    DELIMITERS
        .into_iter()
        .max_by_key(|&d| header.bytes().filter(|&b| b == d).count())
        .filter(|&d| header.bytes().any(|b| b == d))
        .unwrap_or(b',')
}
