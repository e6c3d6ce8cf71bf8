//! Document-level metadata generation.
//!
//! Samples a bounded subset of chunks (start, middle and end of the
//! document), asks the model for a JSON profile and falls back to a
//! neutral placeholder when the model call or the JSON parse fails.
//! Like table enrichment this path never errors.

use crate::client::TextGenerator;
use chrono::Utc;
use lexdoc_core::{DocumentChunk, DocumentMetadata};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Chunks sampled from the start of the document.
const HEAD_SAMPLES: usize = 3;
/// Chunks sampled around the middle.
const MIDDLE_SAMPLES: usize = 2;
/// Chunks sampled from the end.
const TAIL_SAMPLES: usize = 2;
/// Upper bound on the sampled text sent to the model.
const MAX_SAMPLE_CHARS: usize = 6000;

/// JSON profile as returned by the model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    summary: String,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    document_type: String,
    #[serde(default)]
    key_concepts: Vec<String>,
    #[serde(default)]
    language: String,
}

/// Generates a [`DocumentMetadata`] profile from chunk samples.
pub struct MetadataGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl MetadataGenerator {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate a profile for a document. On any failure a placeholder
    /// profile naming the file is returned instead.
    pub async fn generate(&self, filename: &str, chunks: &[DocumentChunk]) -> DocumentMetadata {
        let sample = sample_text(chunks);
        if sample.is_empty() {
            return placeholder(filename);
        }

        match self
            .generator
            .generate(SYSTEM_PROMPT, &profile_prompt(filename, &sample), 0.1)
            .await
        {
            Ok(response) => match parse_profile(&response) {
                Some(profile) => {
                    debug!(filename, "document profile generated");
                    DocumentMetadata {
                        summary: profile.summary,
                        topics: profile.topics,
                        document_type: profile.document_type,
                        key_concepts: profile.key_concepts,
                        language: profile.language,
                        generated_at: Utc::now(),
                    }
                }
                None => {
                    warn!(filename, "profile response was not valid JSON, using placeholder");
                    placeholder(filename)
                }
            },
            Err(err) => {
                warn!(filename, error = %err, "profile generation failed, using placeholder");
                placeholder(filename)
            }
        }
    }
}

const SYSTEM_PROMPT: &str = "You profile documents for a retrieval system. \
Answer with a single JSON object and nothing else, with keys: summary \
(string, 2-3 sentences), topics (array of strings), documentType \
(string), keyConcepts (array of strings), language (ISO 639-1 code).";

fn profile_prompt(filename: &str, sample: &str) -> String {
    format!("Profile the document \"{filename}\" from these excerpts:\n\n{sample}")
}

/// Sample chunk texts from the head, middle and tail of the document,
/// deduplicated by index, capped at [`MAX_SAMPLE_CHARS`].
fn sample_text(chunks: &[DocumentChunk]) -> String {
    let n = chunks.len();
    if n == 0 {
        return String::new();
    }

    let mut indices: Vec<usize> = (0..HEAD_SAMPLES.min(n)).collect();
    if n > HEAD_SAMPLES + TAIL_SAMPLES {
        let mid = n / 2;
        for i in mid..(mid + MIDDLE_SAMPLES).min(n) {
            indices.push(i);
        }
    }
    for i in n.saturating_sub(TAIL_SAMPLES)..n {
        indices.push(i);
    }
    indices.sort_unstable();
    indices.dedup();

    let mut sample = String::new();
    for i in indices {
        let text = chunks[i].text().trim();
        if text.is_empty() {
            continue;
        }
        let remaining = MAX_SAMPLE_CHARS.saturating_sub(sample.len());
        if remaining == 0 {
            break;
        }
        if !sample.is_empty() {
            sample.push_str("\n\n");
        }
        if text.len() > remaining {
            let mut cut = remaining;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            sample.push_str(&text[..cut]);
            break;
        }
        sample.push_str(text);
    }
    sample
}

/// Parse the model's JSON profile, tolerating a markdown code fence
/// around the object.
fn parse_profile(response: &str) -> Option<ProfileResponse> {
    let trimmed = response.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    serde_json::from_str(body).ok()
}

fn placeholder(filename: &str) -> DocumentMetadata {
    DocumentMetadata {
        summary: format!("Document {filename}"),
        topics: Vec::new(),
        document_type: String::new(),
        key_concepts: Vec::new(),
        language: "unknown".to_string(),
        generated_at: Utc::now(),
    }
}
