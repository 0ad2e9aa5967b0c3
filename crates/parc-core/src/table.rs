//! Loader: builds the canonical [`Table`] from a [`RawSheet`].
//!
//! The loader is tolerant by construction: unknown headers are ignored and a
//! missing column yields an empty value on every row. The only rows it drops
//! are the ones without an HME code.
//!
//! # Steps, per row in source order
//!
//! 1. AGENCE is forward-filled from the last non-blank value seen.
//! 2. Codes (HME, RZB, plate) are trimmed and uppercased; free text is trimmed.
//! 3. Serial numbers go through [`clean_serial`], comments through
//!    [`clean_comment`].
//! 4. IMM_NORM is derived from the plate.
//! 5. Rows whose HME code is blank are dropped (after step 1, so a dropped
//!    row still propagates its agency).

use std::collections::{BTreeMap, BTreeSet};

use crate::normalize::{
    clean_code, clean_comment, clean_serial, normalize_registration, normalize_text,
};
use crate::types::{Column, Record};

/// Header → canonical column. Matched exactly after trimming the header.
static HEADER_ALIASES: phf::Map<&'static str, Column> = phf::phf_map! {
    "AGENCE" => Column::Agence,
    "N° DE PARC HME" => Column::ParcHme,
    "N° PARC RZB" => Column::ParcRzb,
    "Libellé" => Column::Libelle,
    "IMMATRICULATION" => Column::Immatriculation,
    "N° SERIE" => Column::Serie,
    "N° SERIE GRUE" => Column::SerieGrue,
    "COMMENTAIRE" => Column::Commentaire,
    "COMMENTAIRES" => Column::Commentaire,
    // Canonical names, so exported files load back.
    "PARC_HME" => Column::ParcHme,
    "PARC_RZB" => Column::ParcRzb,
    "LIBELLE" => Column::Libelle,
};

/// Resolve a source header to its canonical column, if it has one.
pub fn column_for_header(header: &str) -> Option<Column> {
    HEADER_ALIASES.get(header.trim()).copied()
}

// ---------------------------------------------------------------------------
// Raw grid
// ---------------------------------------------------------------------------

/// Untyped grid produced by a source reader: one header row, then data rows.
/// `None` is an empty cell; rows may be shorter or longer than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawSheet {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Uppercased comparison keys, computed once per record at load time.
#[derive(Debug, Clone)]
pub(crate) struct SearchKeys {
    pub agence: String,
    pub parc_hme: String,
    pub parc_rzb: String,
    pub libelle: String,
    pub immatriculation: String,
    pub imm_norm: String,
    pub serie: String,
    pub serie_grue: String,
    pub commentaire: String,
}

impl SearchKeys {
    fn new(record: &Record) -> Self {
        Self {
            agence: normalize_text(record.agence.as_str()),
            parc_hme: normalize_text(record.parc_hme.as_str()),
            parc_rzb: normalize_text(record.parc_rzb.as_str()),
            libelle: normalize_text(record.libelle.as_str()),
            immatriculation: normalize_text(record.immatriculation.as_str()),
            imm_norm: record.imm_norm.clone(),
            serie: clean_serial(record.serie.as_str()),
            serie_grue: clean_serial(record.serie_grue.as_str()),
            commentaire: normalize_text(record.commentaire.as_str()),
        }
    }

    /// The six fields every contains-token is tested against.
    pub fn text_fields(&self) -> [&str; 6] {
        [
            &self.parc_hme,
            &self.parc_rzb,
            &self.immatriculation,
            &self.agence,
            &self.libelle,
            &self.commentaire,
        ]
    }
}

/// The canonical fleet table. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<Record>,
    keys: Vec<SearchKeys>,
    columns: BTreeSet<Column>,
}

impl Table {
    /// Build a table from a raw grid.
    pub fn from_sheet(sheet: &RawSheet) -> Self {
        let index = column_index(&sheet.headers);
        if !index.contains_key(&Column::ParcHme) && !sheet.rows.is_empty() {
            tracing::warn!(
                headers = ?sheet.headers,
                "no header maps to PARC_HME; every row will be dropped"
            );
        }
        let cell = |row: &[Option<String>], column: Column| -> Option<String> {
            index
                .get(&column)
                .and_then(|&i| row.get(i))
                .and_then(|c| c.clone())
        };

        let mut last_agence = String::new();
        let mut dropped = 0usize;
        let mut records = Vec::with_capacity(sheet.rows.len());

        for row in &sheet.rows {
            let row = row.as_slice();
            let agence = clean_label(cell(row, Column::Agence).as_deref());
            if !agence.is_empty() {
                last_agence = agence;
            }

            let parc_hme = clean_code(cell(row, Column::ParcHme).as_deref());
            if parc_hme.is_empty() {
                dropped += 1;
                continue;
            }

            let immatriculation = clean_code(cell(row, Column::Immatriculation).as_deref());
            records.push(Record {
                agence: last_agence.clone(),
                parc_hme,
                parc_rzb: clean_code(cell(row, Column::ParcRzb).as_deref()),
                libelle: clean_label(cell(row, Column::Libelle).as_deref()),
                imm_norm: normalize_registration(immatriculation.as_str()),
                immatriculation,
                serie: clean_serial(cell(row, Column::Serie).as_deref()),
                serie_grue: clean_serial(cell(row, Column::SerieGrue).as_deref()),
                commentaire: clean_comment(cell(row, Column::Commentaire).as_deref()),
            });
        }

        let mut columns: BTreeSet<Column> = index.into_keys().collect();
        columns.insert(Column::ImmNorm);

        if dropped > 0 {
            tracing::warn!(dropped, kept = records.len(), "rows without an HME code dropped");
        }
        tracing::debug!(
            rows = sheet.rows.len(),
            kept = records.len(),
            dropped,
            ?columns,
            "table built from sheet"
        );
        Self::assemble(records, columns)
    }

    /// Build a table from records that are already in canonical form.
    ///
    /// IMM_NORM is re-derived from the plate and records with a blank HME
    /// code are discarded, so the table invariants hold whatever the caller
    /// passes. Every column counts as present.
    pub fn from_records(records: Vec<Record>) -> Self {
        let records = records
            .into_iter()
            .filter(|r| !crate::normalize::is_blank(r.parc_hme.as_str()))
            .map(|mut r| {
                r.imm_norm = normalize_registration(r.immatriculation.as_str());
                r
            })
            .collect();
        Self::assemble(records, Column::ALL.into_iter().collect())
    }

    fn assemble(records: Vec<Record>, columns: BTreeSet<Column>) -> Self {
        let keys = records.iter().map(SearchKeys::new).collect();
        Self { records, keys, columns }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the source provided `column` (IMM_NORM is always present).
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Records paired with their comparison keys, in table order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&Record, &SearchKeys)> {
        self.records.iter().zip(self.keys.iter())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map each canonical column to the index of the first header naming it.
fn column_index(headers: &[String]) -> BTreeMap<Column, usize> {
    let mut index = BTreeMap::new();
    for (i, header) in headers.iter().enumerate() {
        match column_for_header(header) {
            Some(column) => {
                index.entry(column).or_insert(i);
            }
            None => tracing::trace!(header = %header, "ignoring unrecognized column"),
        }
    }
    index
}

/// Free-text labels: trimmed, case preserved, sentinels collapsed.
fn clean_label(v: Option<&str>) -> String {
    clean_comment(v)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
