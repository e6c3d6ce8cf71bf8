//! Structure-aware chunk assembly.
//!
//! Walks parsed structural elements in document order and emits
//! [`LegalChunk`]s: each article merged with its associated (enriched)
//! table where possible, undersized fragments coalesced up to the token
//! ceiling, and structural metadata recomputed from each chunk's own text
//! so it is always self-consistent with the content.

use crate::parser::{detect_cross_references, find_associated_table_index};
use lexdoc_core::{
    ElementType, EnrichedTable, LegalChunk, LegalStructureElement, TextChunk, TokenCounter,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Article heading at the start of a line ("Artikel 4.162 ...").
static ARTICLE_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Artikel\s+(\d+(?:\.\d+)*[a-z]?)").expect("valid regex"));

/// Table caption at the start of a line ("Tabel 4.162 ...").
static TABLE_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Tabel\s+(\d+(?:\.\d+)*[a-z]?)").expect("valid regex"));

/// Assembly options.
#[derive(Debug, Clone, Copy)]
pub struct AssemblerOptions {
    /// Chunks under this floor are merged with the next element when
    /// possible.
    pub min_tokens: usize,
    /// Hard ceiling; merging never pushes a chunk past it.
    pub max_tokens: usize,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            min_tokens: 100,
            max_tokens: 800,
        }
    }
}

/// Structure-aware chunk assembler.
pub struct ChunkAssembler {
    options: AssemblerOptions,
}

impl Default for ChunkAssembler {
    fn default() -> Self {
        Self::new(AssemblerOptions::default())
    }
}

impl ChunkAssembler {
    /// Create an assembler with the given options.
    #[must_use]
    pub const fn new(options: AssemblerOptions) -> Self {
        Self { options }
    }

    /// Assemble chunks from structural elements.
    ///
    /// `enriched` maps element indices of table elements to their
    /// enrichment result; tables consumed into an article chunk are not
    /// re-emitted on their own.
    #[must_use]
    pub fn create_chunks(
        &self,
        elements: &[LegalStructureElement],
        enriched: &HashMap<usize, EnrichedTable>,
    ) -> Vec<LegalChunk> {
        let mut chunks: Vec<LegalChunk> = Vec::new();
        let mut consumed: HashSet<usize> = HashSet::new();
        let mut parent_section: Option<String> = None;

        let mut i = 0;
        while i < elements.len() {
            if consumed.contains(&i) {
                i += 1;
                continue;
            }
            let element = &elements[i];
            match element.element_type {
                ElementType::Hoofdstuk => {
                    // A new chapter invalidates the ambient section.
                    parent_section = None;
                    i += 1;
                }
                ElementType::Afdeling | ElementType::Paragraaf => {
                    parent_section = Some(element.content.clone());
                    i += 1;
                }
                ElementType::Artikel => {
                    let mut text = element.content.clone();
                    let mut end_index = element.end_index;
                    let mut has_table = false;

                    if let Some(table_idx) = find_associated_table_index(element, elements) {
                        if !consumed.contains(&table_idx) {
                            append_table(&mut text, table_idx, elements, enriched);
                            consumed.insert(table_idx);
                            end_index = end_index.max(elements[table_idx].end_index);
                            has_table = true;
                        }
                    }

                    let merged_until = self.merge_undersized(
                        &mut text,
                        &mut has_table,
                        i,
                        elements,
                        enriched,
                        &mut consumed,
                    );
                    end_index = end_index.max(merged_until);

                    chunks.push(build_chunk(
                        text,
                        element,
                        end_index,
                        parent_section.clone(),
                        has_table,
                        chunks.len(),
                    ));
                    i += 1;
                }
                ElementType::Tabel => {
                    // A table never consumed by an article stands alone.
                    let mut text = String::new();
                    append_table(&mut text, i, elements, enriched);
                    let mut has_table = true;
                    let merged_until = self.merge_undersized(
                        &mut text,
                        &mut has_table,
                        i,
                        elements,
                        enriched,
                        &mut consumed,
                    );
                    let end_index = element.end_index.max(merged_until);
                    chunks.push(build_chunk(
                        text,
                        element,
                        end_index,
                        parent_section.clone(),
                        has_table,
                        chunks.len(),
                    ));
                    i += 1;
                }
                ElementType::Lid | ElementType::Text => {
                    let mut text = element.content.clone();
                    let mut has_table = false;
                    let merged_until = self.merge_undersized(
                        &mut text,
                        &mut has_table,
                        i,
                        elements,
                        enriched,
                        &mut consumed,
                    );
                    let end_index = element.end_index.max(merged_until);
                    chunks.push(build_chunk(
                        text,
                        element,
                        end_index,
                        parent_section.clone(),
                        has_table,
                        chunks.len(),
                    ));
                    i += 1;
                }
            }
        }

        chunks
    }

    /// While the chunk is under the token floor, merge following elements
    /// in, provided the next element is not a section/chapter boundary
    /// and the combined size stays under the ceiling. Returns the end
    /// index of the last merged element.
    fn merge_undersized(
        &self,
        text: &mut String,
        has_table: &mut bool,
        start: usize,
        elements: &[LegalStructureElement],
        enriched: &HashMap<usize, EnrichedTable>,
        consumed: &mut HashSet<usize>,
    ) -> usize {
        let mut end_index = elements[start].end_index;
        let mut j = start + 1;
        while TokenCounter::estimate(text) < self.options.min_tokens && j < elements.len() {
            if consumed.contains(&j) {
                j += 1;
                continue;
            }
            let next = &elements[j];
            if next.element_type.is_boundary() {
                break;
            }
            let addition = if next.element_type == ElementType::Tabel {
                rendered_table(j, elements, enriched)
            } else {
                next.content.clone()
            };
            let candidate = format!("{text}\n\n{addition}");
            if TokenCounter::estimate(&candidate) > self.options.max_tokens {
                break;
            }
            *text = candidate;
            if next.element_type == ElementType::Tabel {
                *has_table = true;
            }
            consumed.insert(j);
            end_index = next.end_index;
            j += 1;
        }
        end_index
    }

}

/// Build a chunk whose metadata is recomputed from its own text, not
/// inherited from the elements that produced it.
fn build_chunk(
    text: String,
    seed: &LegalStructureElement,
    end_index: usize,
    parent_section: Option<String>,
    has_table: bool,
    index: usize,
) -> LegalChunk {
    let article_numbers = dedup_captures(&ARTICLE_HEADING_RE, &text);
    let table_names = dedup_captures(&TABLE_HEADING_RE, &text);
    let refs = detect_cross_references(&text);
    let has_cross_reference = refs
        .article_refs
        .iter()
        .any(|r| !article_numbers.contains(r))
        || refs.table_refs.iter().any(|r| !table_names.contains(r));
    let token_count = TokenCounter::estimate(&text);

    LegalChunk {
        chunk: TextChunk {
            text,
            index,
            token_count,
            start_char: seed.start_index,
            end_char: end_index,
            page_number: None,
            section_title: parent_section.clone(),
        },
        article_numbers,
        table_names,
        parent_section,
        has_table,
        has_cross_reference,
        structure_level: seed.level,
    }
}

/// Append a table's enriched rendering (markdown plus synthetic
/// sentences), or its raw content when no enrichment exists.
fn append_table(
    text: &mut String,
    table_idx: usize,
    elements: &[LegalStructureElement],
    enriched: &HashMap<usize, EnrichedTable>,
) {
    let rendered = rendered_table(table_idx, elements, enriched);
    if !text.is_empty() {
        text.push_str("\n\n");
    }
    text.push_str(&rendered);
}

fn rendered_table(
    table_idx: usize,
    elements: &[LegalStructureElement],
    enriched: &HashMap<usize, EnrichedTable>,
) -> String {
    enriched.get(&table_idx).map_or_else(
        || elements[table_idx].content.clone(),
        |e| {
            if e.synthetic_sentences.is_empty() {
                e.markdown.clone()
            } else {
                format!("{}\n\n{}", e.markdown, e.synthetic_sentences.join(" "))
            }
        },
    )
}

fn dedup_captures(re: &Regex, text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for captures in re.captures_iter(text) {
        let id = captures[1].to_string();
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
