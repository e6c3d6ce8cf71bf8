//! Table parsing from XML markup.
//!
//! Recursively locates every table-shaped subtree regardless of nesting
//! depth and normalizes it into a [`ParsedTable`]. Merge spans are
//! captured on the cell, never expanded into duplicate cells. A malformed
//! table yields no result for that table (logged, not propagated) so one
//! bad table cannot abort parsing of the rest of the document.

use crate::parser::ARTICLE_REF_RE;
use lexdoc_core::{
    LexdocError, ParsedTable, Result, TableCell, TableMetadata, TableRow,
};
use roxmltree::Node;
use tracing::warn;

const TABLE_TAGS: &[&str] = &["tabel", "table"];
const ROW_TAGS: &[&str] = &["row", "rij", "tr"];
const CELL_TAGS: &[&str] = &["entry", "cel", "cell", "td", "th"];
const HEADER_CONTAINER_TAGS: &[&str] = &["thead", "kolomkop"];

/// Parse every table in an XML fragment.
///
/// The outermost table-shaped node wins when table tags nest (Dutch legal
/// markup wraps a CALS `<table>` in a `<tabel>` container); its rows are
/// collected from the whole subtree.
pub fn parse_tables(xml: &str) -> Result<Vec<ParsedTable>> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| LexdocError::Xml(e.to_string()))?;

    let mut tables = Vec::new();
    for node in doc.descendants().filter(|n| {
        n.is_element()
            && TABLE_TAGS.contains(&n.tag_name().name())
            && !n
                .ancestors()
                .skip(1)
                .any(|a| a.is_element() && TABLE_TAGS.contains(&a.tag_name().name()))
    }) {
        match parse_table_node(node) {
            Some(table) => tables.push(table),
            None => warn!(
                tag = node.tag_name().name(),
                "skipping malformed table markup"
            ),
        }
    }
    Ok(tables)
}

/// Normalize one table subtree; `None` when the markup has no usable rows.
fn parse_table_node(node: Node<'_, '_>) -> Option<ParsedTable> {
    let mut headers: Vec<TableRow> = Vec::new();
    let mut data_rows: Vec<TableRow> = Vec::new();

    for (row_index, row_node) in node
        .descendants()
        .filter(|n| n.is_element() && ROW_TAGS.contains(&n.tag_name().name()))
        .enumerate()
    {
        let is_header = row_node.ancestors().skip(1).any(|a| {
            a.is_element() && HEADER_CONTAINER_TAGS.contains(&a.tag_name().name())
        });
        let cells: Vec<TableCell> = row_node
            .children()
            .filter(|n| n.is_element() && CELL_TAGS.contains(&n.tag_name().name()))
            .enumerate()
            .map(|(col_index, cell_node)| TableCell {
                value: flattened_text(cell_node),
                col_index,
                row_index,
                colspan: span_attribute(cell_node, "colspan"),
                rowspan: rowspan_of(cell_node),
            })
            .collect();
        if cells.is_empty() {
            continue;
        }
        let row = TableRow {
            cells,
            row_index,
            is_header,
        };
        if is_header {
            headers.push(row);
        } else {
            data_rows.push(row);
        }
    }

    if headers.is_empty() && data_rows.is_empty() {
        return None;
    }

    let total_columns = column_count(node, &headers, &data_rows);
    if total_columns == 0 {
        return None;
    }

    let columns = resolve_columns(&headers, total_columns);
    let title = table_title(node);
    let table_number = table_identifier(node, &title);
    let article_references = collect_article_references(&data_rows);

    Some(ParsedTable {
        title,
        table_number,
        columns,
        metadata: TableMetadata {
            total_columns,
            total_rows: data_rows.len(),
            article_references,
        },
        headers,
        data_rows,
    })
}

/// Column count from attribute metadata (`<tgroup cols="...">`), else
/// from the row with the most cells.
fn column_count(node: Node<'_, '_>, headers: &[TableRow], data_rows: &[TableRow]) -> usize {
    let declared = node
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "tgroup")
        .find_map(|n| n.attribute("cols").and_then(|c| c.trim().parse().ok()));
    if let Some(cols) = declared {
        return cols;
    }
    headers
        .iter()
        .chain(data_rows)
        .map(|r| r.cells.len())
        .max()
        .unwrap_or(0)
}

/// Column names from the first header row's non-empty cell values, padded
/// with synthetic names; fully synthetic when no header is resolvable.
fn resolve_columns(headers: &[TableRow], total_columns: usize) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(total_columns);
    if let Some(first) = headers.first() {
        for cell in &first.cells {
            if !cell.value.trim().is_empty() {
                columns.push(cell.value.trim().to_string());
            }
        }
    }
    if columns.is_empty() {
        return (1..=total_columns).map(|i| format!("Column {i}")).collect();
    }
    for i in columns.len()..total_columns {
        columns.push(format!("Column {}", i + 1));
    }
    columns
}

/// Title from a direct `<titel>` child or one nested in a `<kop>`.
fn table_title(node: Node<'_, '_>) -> String {
    heading_child(node, &["titel", "title"])
        .map(flattened_text)
        .unwrap_or_default()
}

fn table_identifier(node: Node<'_, '_>, title: &str) -> Option<String> {
    if let Some(nr) = node.attribute("nr") {
        return Some(nr.trim().to_string());
    }
    if let Some(nr) = heading_child(node, &["nr"]) {
        return Some(flattened_text(nr));
    }
    // "Tabel 4.162 ..." titles carry the identifier inline
    crate::parser::TABLE_REF_RE
        .captures(title)
        .map(|c| c[1].to_string())
}

/// Direct child with one of the given tags, or such a child inside a
/// `<kop>` heading container.
fn heading_child<'a, 'input>(
    node: Node<'a, 'input>,
    tags: &[&str],
) -> Option<Node<'a, 'input>> {
    let direct = node
        .children()
        .filter(Node::is_element)
        .find(|n| tags.contains(&n.tag_name().name()));
    if direct.is_some() {
        return direct;
    }
    node.children()
        .filter(|n| n.is_element() && n.tag_name().name() == "kop")
        .flat_map(|kop| kop.children().filter(Node::is_element))
        .find(|n| tags.contains(&n.tag_name().name()))
}

fn span_attribute(node: Node<'_, '_>, name: &str) -> Option<usize> {
    node.attribute(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&v| v > 1)
}

/// `rowspan` attribute, or CALS `morerows` (rows spanned below this one).
fn rowspan_of(node: Node<'_, '_>) -> Option<usize> {
    span_attribute(node, "rowspan").or_else(|| {
        node.attribute("morerows")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&v| v > 0)
            .map(|v| v + 1)
    })
}

fn flattened_text(node: Node<'_, '_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for descendant in node.descendants().filter(Node::is_text) {
        if let Some(text) = descendant.text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed);
            }
        }
    }
    parts.join(" ")
}

fn collect_article_references(data_rows: &[TableRow]) -> Vec<String> {
    let mut refs = Vec::new();
    for row in data_rows {
        for cell in &row.cells {
            for captures in ARTICLE_REF_RE.captures_iter(&cell.value) {
                let id = captures[1].to_string();
                if !refs.contains(&id) {
                    refs.push(id);
                }
            }
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALS_TABLE: &str = r#"<tabel nr="4.162">
  <titel>Tabel 4.162 Daglichtoppervlakte</titel>
  <table>
    <tgroup cols="3">
      <thead>
        <row><entry>gebruiksfunctie</entry><entry>grenswaarde</entry><entry>eis</entry></row>
      </thead>
      <tbody>
        <row><entry>woonfunctie</entry><entry>0,5 m2</entry><entry>zie artikel 4.161</entry></row>
        <row><entry morerows="1">bijeenkomstfunctie</entry><entry>2,5 m2</entry><entry>-</entry></row>
        <row><entry>kinderopvang</entry><entry>3,0 m2</entry><entry>zie artikel 4.161</entry></row>
      </tbody>
    </tgroup>
  </table>
</tabel>"#;

    #[test]
    fn test_parses_headers_and_rows() {
        let tables = parse_tables(CALS_TABLE).unwrap();
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.table_number.as_deref(), Some("4.162"));
        assert_eq!(table.columns, vec!["gebruiksfunctie", "grenswaarde", "eis"]);
        assert_eq!(table.metadata.total_columns, 3);
        assert_eq!(table.metadata.total_rows, 3);
        assert_eq!(table.headers.len(), 1);
        assert!(table.data_rows.iter().all(|r| !r.is_header));
    }

    #[test]
    fn test_spans_captured_not_expanded() {
        let tables = parse_tables(CALS_TABLE).unwrap();
        let row = &tables[0].data_rows[1];
        assert_eq!(row.cells[0].rowspan, Some(2));
        assert_eq!(row.cells.len(), 3);
    }

    #[test]
    fn test_article_references_deduplicated() {
        let tables = parse_tables(CALS_TABLE).unwrap();
        assert_eq!(tables[0].metadata.article_references, vec!["4.161"]);
    }

    #[test]
    fn test_synthetic_columns_without_header() {
        let xml = r"<table><row><cel>a</cel><cel>b</cel></row><row><cel>c</cel></row></table>";
        let tables = parse_tables(xml).unwrap();
        assert_eq!(tables[0].columns, vec!["Column 1", "Column 2"]);
        assert_eq!(tables[0].metadata.total_rows, 2);
    }

    #[test]
    fn test_malformed_table_skipped_not_fatal() {
        let xml = r"<root><tabel><titel>leeg</titel></tabel><table><row><entry>x</entry></row></table></root>";
        let tables = parse_tables(xml).unwrap();
        // The row-less table is dropped; the valid one survives.
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].data_rows[0].cells[0].value, "x");
    }

    #[test]
    fn test_markdown_round_trip_row_order() {
        let tables = parse_tables(CALS_TABLE).unwrap();
        let markdown = tables[0].to_markdown();
        let woon = markdown.find("woonfunctie").unwrap();
        let bijeen = markdown.find("bijeenkomstfunctie").unwrap();
        let kinder = markdown.find("kinderopvang").unwrap();
        assert!(woon < bijeen && bijeen < kinder);
    }

    #[test]
    fn test_identifier_and_title_from_kop() {
        let xml = r#"<tabel><kop><nr>2.9</nr><titel>Sterkte</titel></kop>
            <row><entry>a</entry><entry>b</entry></row></tabel>"#;
        let tables = parse_tables(xml).unwrap();
        assert_eq!(tables[0].table_number.as_deref(), Some("2.9"));
        assert_eq!(tables[0].title, "Sterkte");
    }

    #[test]
    fn test_invalid_xml_is_an_error() {
        assert!(parse_tables("<tabel><row>").is_err());
    }
}
