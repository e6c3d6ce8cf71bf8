//! Normalized table model and its markdown/JSON renderings.
//!
//! A [`ParsedTable`] is produced by the table parser from tabular XML
//! markup and later referenced (not owned) by the enrichment
//! orchestrator. Column/row spans are captured on the cell but never
//! expanded into duplicate cells; consumers interpret spans explicitly.

use serde::{Deserialize, Serialize};

/// A single table cell with grid position and optional merge spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text.
    pub value: String,
    /// 0-based column index.
    pub col_index: usize,
    /// 0-based row index.
    pub row_index: usize,
    /// Number of columns this cell spans, when > 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colspan: Option<usize>,
    /// Number of rows this cell spans, when > 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rowspan: Option<usize>,
}

/// One table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in column order.
    pub cells: Vec<TableCell>,
    /// 0-based row index within the table.
    pub row_index: usize,
    /// Whether the row belongs to the header block.
    pub is_header: bool,
}

impl TableRow {
    /// Whether every cell in the row is empty or whitespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.value.trim().is_empty())
    }
}

/// Table-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Resolved or inferred column count.
    pub total_columns: usize,
    /// Number of data rows (header rows excluded).
    pub total_rows: usize,
    /// Article identifiers referenced inside data cells, deduplicated.
    pub article_references: Vec<String>,
}

/// A normalized table: rows, cells, merge spans and inferred headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTable {
    /// Table title, possibly empty.
    pub title: String,
    /// Dotted numeric identifier (e.g. "4.162"), when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    /// Column names: from the first header row, else synthetic
    /// (`Column 1`, `Column 2`, ...).
    pub columns: Vec<String>,
    /// Header rows.
    pub headers: Vec<TableRow>,
    /// Data rows; never includes header rows.
    pub data_rows: Vec<TableRow>,
    /// Table-level metadata.
    pub metadata: TableMetadata,
}

impl ParsedTable {
    /// Display name for prompts and fallback sentences: the identifier
    /// when present, else the title, else "tabel".
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.table_number, self.title.trim()) {
            (Some(nr), _) => format!("Tabel {nr}"),
            (None, title) if !title.is_empty() => title.to_string(),
            _ => "tabel".to_string(),
        }
    }

    /// Render the table as a markdown pipe table, one markdown row per
    /// data row in the original order, preceded by a caption line.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let caption = self.display_name();
        let title = self.title.trim();
        if title.is_empty() || caption.contains(title) || title.contains(&caption) {
            out.push_str(&format!("{caption}\n\n"));
        } else {
            out.push_str(&format!("{caption}: {title}\n\n"));
        }

        out.push_str(&format!("| {} |\n", self.columns.join(" | ")));
        out.push_str(&format!(
            "|{}\n",
            " --- |".repeat(self.columns.len().max(1))
        ));

        for row in &self.data_rows {
            let mut values = vec![String::new(); self.columns.len().max(row.cells.len())];
            for cell in &row.cells {
                if cell.col_index < values.len() {
                    values[cell.col_index] = cell.value.replace('|', "\\|");
                }
            }
            out.push_str(&format!("| {} |\n", values.join(" | ")));
        }

        out
    }

    /// Render the table as a JSON object keyed by column name, for the
    /// `structured_data` field of an enriched table.
    #[must_use]
    pub fn structured_data(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .data_rows
            .iter()
            .map(|row| {
                let mut obj = serde_json::Map::new();
                for cell in &row.cells {
                    let key = self
                        .columns
                        .get(cell.col_index)
                        .cloned()
                        .unwrap_or_else(|| format!("Column {}", cell.col_index + 1));
                    obj.insert(key, serde_json::Value::String(cell.value.clone()));
                }
                serde_json::Value::Object(obj)
            })
            .collect();

        serde_json::json!({
            "title": self.title,
            "tableNumber": self.table_number,
            "columns": self.columns,
            "rows": rows,
            "articleReferences": self.metadata.article_references,
        })
    }
}

/// A table plus the natural-language sentences generated for it.
///
/// Created once per enrichment call and consumed by the chunk assembler;
/// `degraded` records that the deterministic fallback was used instead of
/// the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedTable {
    /// The table that was enriched.
    pub table: ParsedTable,
    /// One natural-language sentence per data row when the model
    /// succeeds; on fallback, one per non-empty row.
    pub synthetic_sentences: Vec<String>,
    /// JSON rendering of the table grid.
    pub structured_data: serde_json::Value,
    /// Markdown rendering used in the enrichment prompt and in chunks.
    pub markdown: String,
    /// True when the fallback sentence template was used.
    pub degraded: bool,
}
