//! Legal document structure parsing.
//!
//! Parses Dutch legal markup (hoofdstuk/afdeling/paragraaf/artikel/tabel)
//! into an ordered list of [`LegalStructureElement`]s. Well-formed XML is
//! walked as a DOM tree; input that is not well-formed XML falls back to
//! line-anchored marker scanning so plain-text renditions of the same
//! documents still parse. Finding no markers at all is a recoverable
//! condition: the caller falls back to paragraph-based chunking.

use lexdoc_core::{CrossReferences, ElementType, LegalStructureElement};
use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::Node;

/// In-text reference to an article identifier ("artikel 4.162").
pub static ARTICLE_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)artikel\s+(\d+(?:\.\d+)+[a-z]?)").expect("valid regex"));

/// In-text reference to a table identifier ("tabel 4.162").
pub static TABLE_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tabel\s+(\d+(?:\.\d+)+[a-z]?)").expect("valid regex"));

/// Line-anchored structural marker for the plain-text fallback.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^(hoofdstuk|afdeling|paragraaf|artikel|tabel)\s+(\d+(?:\.\d+)*[a-z]?)\.?\s*(\S.*)?$")
        .expect("valid regex")
});

/// Parse legal markup into structural elements, ordered by position.
///
/// Returns an empty vector when no structural markers are recognized;
/// that is not an error.
#[must_use]
pub fn parse_structure(text: &str) -> Vec<LegalStructureElement> {
    if let Ok(doc) = roxmltree::Document::parse(text) {
        let mut elements = Vec::new();
        collect_from_dom(doc.root_element(), text, false, &mut elements);
        elements.sort_by_key(|e| e.start_index);
        return elements;
    }
    parse_text_markers(text)
}

/// Scan a text span for explicit references to article/table identifiers.
#[must_use]
pub fn detect_cross_references(text: &str) -> CrossReferences {
    let article_refs = dedup_captures(&ARTICLE_REF_RE, text);
    let table_refs = dedup_captures(&TABLE_REF_RE, text);
    CrossReferences {
        has_references: !article_refs.is_empty() || !table_refs.is_empty(),
        article_refs,
        table_refs,
    }
}

/// Find the table associated with an article.
///
/// Searches forward from the article's position for table elements before
/// the next article, preferring one whose identifier exactly matches the
/// article's; otherwise the nearest following table. Returns `None` when
/// no table precedes the next article.
#[must_use]
pub fn find_associated_table<'a>(
    article: &LegalStructureElement,
    elements: &'a [LegalStructureElement],
) -> Option<&'a LegalStructureElement> {
    find_associated_table_index(article, elements).map(|i| &elements[i])
}

/// Index-returning variant of [`find_associated_table`], used by the
/// assembler to mark the table element as consumed.
#[must_use]
pub fn find_associated_table_index(
    article: &LegalStructureElement,
    elements: &[LegalStructureElement],
) -> Option<usize> {
    let mut nearest: Option<usize> = None;
    for (i, element) in elements.iter().enumerate() {
        if element.start_index <= article.start_index {
            continue;
        }
        match element.element_type {
            ElementType::Artikel => break,
            ElementType::Tabel => {
                if element.identifier.is_some() && element.identifier == article.identifier {
                    return Some(i);
                }
                nearest.get_or_insert(i);
            }
            _ => {}
        }
    }
    nearest
}

fn dedup_captures(re: &Regex, text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for captures in re.captures_iter(text) {
        let id = captures[1].to_string();
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

fn element_type_for_tag(tag: &str) -> Option<ElementType> {
    // roxmltree lowercases nothing; Dutch legal markup uses lowercase tags
    match tag {
        "hoofdstuk" => Some(ElementType::Hoofdstuk),
        "afdeling" => Some(ElementType::Afdeling),
        "paragraaf" => Some(ElementType::Paragraaf),
        "artikel" => Some(ElementType::Artikel),
        "lid" => Some(ElementType::Lid),
        "tabel" | "table" => Some(ElementType::Tabel),
        _ => None,
    }
}

fn label(element_type: ElementType) -> &'static str {
    match element_type {
        ElementType::Hoofdstuk => "Hoofdstuk",
        ElementType::Afdeling => "Afdeling",
        ElementType::Paragraaf => "Paragraaf",
        ElementType::Artikel => "Artikel",
        ElementType::Lid => "Lid",
        ElementType::Tabel => "Tabel",
        ElementType::Text => "",
    }
}

/// Recursive DOM walk; depth is data-dependent, never hard-coded.
fn collect_from_dom(
    node: Node<'_, '_>,
    source: &str,
    inside_artikel: bool,
    out: &mut Vec<LegalStructureElement>,
) {
    for child in node.children().filter(Node::is_element) {
        let tag = child.tag_name().name();
        match element_type_for_tag(tag) {
            Some(element_type) => {
                let descend_inside_artikel =
                    inside_artikel || element_type == ElementType::Artikel;
                match element_type {
                    ElementType::Tabel => {
                        out.push(table_element(child, source));
                        // Nested table-shaped subtrees belong to the table
                        // parser, not the structure walk.
                    }
                    ElementType::Artikel => {
                        out.push(content_element(child, ElementType::Artikel, source));
                        collect_from_dom(child, source, true, out);
                    }
                    ElementType::Lid => {
                        // Lids inside an article are already part of the
                        // article's content; only free-standing ones are
                        // emitted.
                        if !inside_artikel {
                            out.push(content_element(child, ElementType::Lid, source));
                        }
                        collect_from_dom(child, source, descend_inside_artikel, out);
                    }
                    _ => {
                        out.push(heading_element(child, element_type, source));
                        collect_from_dom(child, source, descend_inside_artikel, out);
                    }
                }
            }
            None => collect_from_dom(child, source, inside_artikel, out),
        }
    }
}

/// Identifier from an `nr` attribute, a `<kop><nr>` child or a direct
/// `<nr>` child.
fn identifier_of(node: Node<'_, '_>) -> Option<String> {
    if let Some(nr) = node.attribute("nr") {
        return Some(nr.trim().to_string());
    }
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "kop" => {
                for grandchild in child.children().filter(Node::is_element) {
                    if grandchild.tag_name().name() == "nr" {
                        return text_of(grandchild, &[]).into();
                    }
                }
            }
            "nr" => return text_of(child, &[]).into(),
            _ => {}
        }
    }
    None
}

/// Title from a `<kop><titel>` child or a direct `<titel>` child.
fn title_of(node: Node<'_, '_>) -> Option<String> {
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "kop" => {
                for grandchild in child.children().filter(Node::is_element) {
                    if grandchild.tag_name().name() == "titel" {
                        return Some(text_of(grandchild, &[]));
                    }
                }
            }
            "titel" => return Some(text_of(child, &[])),
            _ => {}
        }
    }
    None
}

/// Flattened descendant text, skipping subtrees with the given tags.
fn text_of(node: Node<'_, '_>, skip_tags: &[&str]) -> String {
    let mut parts: Vec<String> = Vec::new();
    collect_text(node, skip_tags, &mut parts);
    parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(node: Node<'_, '_>, skip_tags: &[&str], parts: &mut Vec<String>) {
    for child in node.children() {
        if child.is_text() {
            if let Some(text) = child.text() {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
        } else if child.is_element() && !skip_tags.contains(&child.tag_name().name()) {
            collect_text(child, skip_tags, parts);
        }
    }
}

fn heading_line(node: Node<'_, '_>, element_type: ElementType) -> String {
    let mut line = label(element_type).to_string();
    if let Some(nr) = identifier_of(node) {
        line.push(' ');
        line.push_str(&nr);
    }
    if let Some(title) = title_of(node) {
        if !title.is_empty() {
            line.push(' ');
            line.push_str(&title);
        }
    }
    line
}

/// Container element (hoofdstuk/afdeling/paragraaf): heading only, the
/// nested articles and tables are emitted separately.
fn heading_element(
    node: Node<'_, '_>,
    element_type: ElementType,
    _source: &str,
) -> LegalStructureElement {
    let range = node.range();
    LegalStructureElement {
        element_type,
        content: heading_line(node, element_type),
        identifier: identifier_of(node),
        start_index: range.start,
        end_index: range.end,
        level: element_type.level(),
    }
}

/// Content-bearing element (artikel/lid): heading line plus flattened
/// body text, excluding nested table subtrees and the kop itself.
fn content_element(
    node: Node<'_, '_>,
    element_type: ElementType,
    _source: &str,
) -> LegalStructureElement {
    let body = text_of(node, &["tabel", "table", "kop"]);
    let mut content = heading_line(node, element_type);
    if !body.is_empty() {
        content.push('\n');
        content.push_str(&body);
    }
    let range = node.range();
    LegalStructureElement {
        element_type,
        content,
        identifier: identifier_of(node),
        start_index: range.start,
        end_index: range.end,
        level: element_type.level(),
    }
}

/// Table element: content is the raw XML slice so the table parser can
/// re-parse it.
fn table_element(node: Node<'_, '_>, source: &str) -> LegalStructureElement {
    let range = node.range();
    LegalStructureElement {
        element_type: ElementType::Tabel,
        content: source[range.start..range.end].to_string(),
        identifier: identifier_of(node),
        start_index: range.start,
        end_index: range.end,
        level: ElementType::Tabel.level(),
    }
}

/// Plain-text fallback: line-anchored markers with boundary lookahead to
/// the next marker or end of document.
fn parse_text_markers(text: &str) -> Vec<LegalStructureElement> {
    let matches: Vec<(usize, usize, ElementType, String)> = MARKER_RE
        .captures_iter(text)
        .map(|captures| {
            let whole = captures.get(0).expect("match");
            let keyword = captures[1].to_lowercase();
            let element_type = match keyword.as_str() {
                "hoofdstuk" => ElementType::Hoofdstuk,
                "afdeling" => ElementType::Afdeling,
                "paragraaf" => ElementType::Paragraaf,
                "tabel" => ElementType::Tabel,
                _ => ElementType::Artikel,
            };
            (
                whole.start(),
                whole.end(),
                element_type,
                captures[2].to_string(),
            )
        })
        .collect();

    if matches.is_empty() {
        return Vec::new();
    }

    let mut elements = Vec::new();

    // Text before the first marker is preserved as a free-standing element.
    let head = text[..matches[0].0].trim();
    if !head.is_empty() {
        elements.push(LegalStructureElement {
            element_type: ElementType::Text,
            content: head.to_string(),
            identifier: None,
            start_index: 0,
            end_index: matches[0].0,
            level: ElementType::Text.level(),
        });
    }

    for (i, (start, _end, element_type, identifier)) in matches.iter().enumerate() {
        let boundary = matches
            .get(i + 1)
            .map_or(text.len(), |next| next.0);
        let content = text[*start..boundary].trim().to_string();
        elements.push(LegalStructureElement {
            element_type: *element_type,
            content,
            identifier: Some(identifier.clone()),
            start_index: *start,
            end_index: boundary,
            level: element_type.level(),
        });
    }

    elements
}
