//! Export of search and batch results as CSV, JSON or HTML.
//!
//! Results are first flattened into an [`ExportSheet`] (header row plus
//! string cells) and then written in the requested [`ExportFormat`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::batch::BatchOutcome;
use crate::error::ExportError;
use crate::table::Table;
use crate::types::{Column, Record};

/// Default file name for a single search export.
pub const RESULTS_FILE_NAME: &str = "resultats_parc.csv";
/// Default file name for a batch export.
pub const BATCH_FILE_NAME: &str = "multi_resultats_parc.csv";

/// Header of the column holding the originating query in batch exports.
pub const QUERY_COLUMN: &str = "RECHERCHE";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }

    /// Guess the format from a file extension; CSV when unknown.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "html" | "htm" => Ok(ExportFormat::Html),
            other => Err(format!("unknown export format {other:?} (expected csv|json|html)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Sheet
// ---------------------------------------------------------------------------

/// Columns shown to the user: the five identity columns, plus COMMENTAIRE
/// when the source had it.
pub fn display_columns(table: &Table) -> Vec<Column> {
    let mut columns = vec![
        Column::Agence,
        Column::ParcHme,
        Column::ParcRzb,
        Column::Immatriculation,
        Column::Libelle,
    ];
    if table.has_column(Column::Commentaire) {
        columns.push(Column::Commentaire);
    }
    columns
}

/// A flattened result set, ready to be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportSheet {
    /// Sheet for one search.
    pub fn from_results(table: &Table, results: &[&Record]) -> Self {
        let columns = display_columns(table);
        Self {
            headers: columns.iter().map(|c| c.name().to_string()).collect(),
            rows: results
                .iter()
                .map(|r| columns.iter().map(|&c| r.get(c).to_string()).collect())
                .collect(),
        }
    }

    /// Sheet for a batch, with the originating query in the first column.
    pub fn from_batch(table: &Table, outcome: &BatchOutcome<'_>) -> Self {
        Self::from_tagged(table, outcome.iter_hits().map(|hit| (hit.query, hit.record)))
    }

    /// Sheet of `(query, record)` pairs, with the query in the first column.
    pub fn from_tagged<'a>(
        table: &Table,
        hits: impl IntoIterator<Item = (&'a str, &'a Record)>,
    ) -> Self {
        let columns = display_columns(table);
        let mut headers = vec![QUERY_COLUMN.to_string()];
        headers.extend(columns.iter().map(|c| c.name().to_string()));
        let rows = hits
            .into_iter()
            .map(|(query, record)| {
                let mut row = vec![query.to_string()];
                row.extend(columns.iter().map(|&c| record.get(c).to_string()));
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write `sheet` to `out` in `format`.
pub fn write<W: Write>(out: W, format: ExportFormat, sheet: &ExportSheet) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(out, sheet),
        ExportFormat::Json => write_json(out, sheet),
        ExportFormat::Html => write_html(out, sheet),
    }
}

/// Write `sheet` to a file, creating or truncating it.
pub fn write_to_path(path: &Path, format: ExportFormat, sheet: &ExportSheet) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write(&mut out, format, sheet)?;
    out.flush()?;
    tracing::info!(path = %path.display(), %format, rows = sheet.rows.len(), "export written");
    Ok(())
}

fn write_csv<W: Write>(out: W, sheet: &ExportSheet) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);
    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write>(mut out: W, sheet: &ExportSheet) -> Result<(), ExportError> {
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = sheet
        .rows
        .iter()
        .map(|row| {
            sheet
                .headers
                .iter()
                .cloned()
                .zip(row.iter().cloned().map(serde_json::Value::String))
                .collect()
        })
        .collect();
    serde_json::to_writer_pretty(&mut out, &objects)?;
    writeln!(out)?;
    Ok(())
}

fn write_html<W: Write>(mut out: W, sheet: &ExportSheet) -> Result<(), ExportError> {
    writeln!(out, "<table>")?;
    writeln!(out, "  <thead>")?;
    write!(out, "    <tr>")?;
    for header in &sheet.headers {
        write!(out, "<th>{}</th>", escape_html(header))?;
    }
    writeln!(out, "</tr>")?;
    writeln!(out, "  </thead>")?;
    writeln!(out, "  <tbody>")?;
    for row in &sheet.rows {
        write!(out, "    <tr>")?;
        for cell in row {
            write!(out, "<td>{}</td>", escape_html(cell))?;
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "  </tbody>")?;
    writeln!(out, "</table>")?;
    Ok(())
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
