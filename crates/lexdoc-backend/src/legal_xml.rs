//! Dutch legal XML extraction.
//!
//! The only backend that pre-chunks: structural elements are parsed,
//! tables enriched in batches and assembled into structure-aware chunks.
//! When no structure is found the document text is flattened and handed
//! to the plain token-aware chunker downstream.

use lexdoc_core::{ElementType, EnrichedTable, ParsedTable, Result};
use lexdoc_enrich::TableEnricher;
use lexdoc_structure::{parse_structure, parse_tables, ChunkAssembler};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::ExtractionResult;

/// Extract a legal XML document into pre-assembled structural chunks.
pub async fn extract(enricher: &TableEnricher, bytes: &[u8]) -> Result<ExtractionResult> {
    let content = String::from_utf8_lossy(bytes);
    let elements = parse_structure(&content);

    if elements.is_empty() {
        warn!("no legal structure detected, flattening to plain text");
        return Ok(ExtractionResult {
            text: flatten_text(&content),
            extraction_method: "legal-structure".to_string(),
            warnings: vec![
                "no legal structure detected; document was chunked as plain text".to_string(),
            ],
            ..ExtractionResult::default()
        });
    }

    // Parse each table element individually so enrichment results can be
    // keyed back to their element index for the assembler.
    let mut warnings = Vec::new();
    let mut table_indices: Vec<usize> = Vec::new();
    let mut parsed: Vec<ParsedTable> = Vec::new();
    for (i, element) in elements.iter().enumerate() {
        if element.element_type != ElementType::Tabel {
            continue;
        }
        match parse_tables(&element.content) {
            Ok(mut tables) if !tables.is_empty() => {
                table_indices.push(i);
                parsed.push(tables.remove(0));
            }
            Ok(_) => {
                warnings.push(format!(
                    "table at offset {} could not be normalized and was kept as raw text",
                    element.start_index
                ));
            }
            Err(err) => {
                warnings.push(format!(
                    "table at offset {} failed to parse ({err}) and was kept as raw text",
                    element.start_index
                ));
            }
        }
    }

    let results = enricher.enrich_tables(&parsed).await;
    let degraded = results.iter().any(|e| e.degraded);
    let enriched: HashMap<usize, EnrichedTable> =
        table_indices.into_iter().zip(results).collect();

    let chunks = ChunkAssembler::default().create_chunks(&elements, &enriched);
    debug!(
        elements = elements.len(),
        tables = enriched.len(),
        chunks = chunks.len(),
        degraded,
        "legal structure assembled"
    );

    Ok(ExtractionResult {
        text: content.into_owned(),
        extraction_method: "legal-structure".to_string(),
        warnings,
        prechunked: Some(chunks),
        degraded,
        ..ExtractionResult::default()
    })
}

/// Flatten XML to its text content; used when the document parses as XML
/// but carries no recognizable legal structure.
fn flatten_text(content: &str) -> String {
    let Ok(doc) = roxmltree::Document::parse(content) else {
        return content.to_string();
    };
    let mut out = String::new();
    for node in doc.descendants().filter(|n| n.is_text()) {
        let text = node.text().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lexdoc_core::LexdocError;
    use lexdoc_enrich::TextGenerator;
    use std::sync::Arc;
    use std::time::Duration;

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(
            &self,
            _system: &str,
            _user: &str,
            _temperature: f32,
        ) -> Result<String> {
            Err(LexdocError::Model("offline".to_string()))
        }
    }

    fn enricher() -> TableEnricher {
        TableEnricher::new(Arc::new(FailingGenerator)).with_batching(4, Duration::from_millis(0))
    }

    const LEGAL_XML: &str = r#"<wetgeving>
  <hoofdstuk><kop><nr>4</nr><titel>Bruikbaarheid</titel></kop>
    <afdeling><kop><nr>4.7</nr><titel>Daglicht</titel></kop>
      <artikel><kop><nr>4.162</nr><titel>Daglichtoppervlakte</titel></kop>
        <lid>De daglichtoppervlakte bedraagt ten minste de in tabel 4.162 gegeven waarde, uitgedrukt in vierkante meters en bepaald volgens NEN 2057, voor iedere gebruiksfunctie afzonderlijk.</lid>
      </artikel>
      <tabel><kop><nr>4.162</nr><titel>Daglichtoppervlakte</titel></kop>
        <tgroup cols="2">
          <thead><row><entry>gebruiksfunctie</entry><entry>oppervlakte</entry></row></thead>
          <row><entry>woonfunctie</entry><entry>0,5 m2</entry></row>
        </tgroup>
      </tabel>
    </afdeling>
  </hoofdstuk>
</wetgeving>"#;

    #[tokio::test]
    async fn test_structured_document_is_prechunked() {
        let result = extract(&enricher(), LEGAL_XML.as_bytes()).await.unwrap();
        assert_eq!(result.extraction_method, "legal-structure");
        let chunks = result.prechunked.expect("structured input pre-chunks");
        assert!(!chunks.is_empty());
        assert!(chunks[0].article_numbers.contains(&"4.162".to_string()));
        assert!(chunks[0].has_table);
        // Offline generator means fallback sentences were used.
        assert!(result.degraded);
    }

    #[tokio::test]
    async fn test_structureless_xml_flattens_to_text() {
        let xml = "<notitie><regel>Geen juridische structuur hier.</regel></notitie>";
        let result = extract(&enricher(), xml.as_bytes()).await.unwrap();
        assert!(result.prechunked.is_none());
        assert_eq!(result.text, "Geen juridische structuur hier.");
        assert_eq!(result.warnings.len(), 1);
        assert!(!result.degraded);
    }
}
