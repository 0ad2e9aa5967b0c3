//! Test builders: ergonomic constructors for `Record`, `RawSheet` and tables.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use parc_core::{RawSheet, Record, Table};

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Record`] fixtures.
///
/// ```rust
/// let record = RecordBuilder::new("H01100M")
///     .rzb("X001L")
///     .plate("AB-123-CD")
///     .libelle("Pelle bassin")
///     .build();
/// ```
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(hme: &str) -> Self {
        Self {
            record: Record {
                agence: "PARIS".to_string(),
                parc_hme: hme.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn agence(mut self, agence: &str) -> Self {
        self.record.agence = agence.to_string();
        self
    }

    pub fn rzb(mut self, rzb: &str) -> Self {
        self.record.parc_rzb = rzb.to_string();
        self
    }

    pub fn plate(mut self, plate: &str) -> Self {
        self.record.immatriculation = plate.to_string();
        self
    }

    pub fn libelle(mut self, libelle: &str) -> Self {
        self.record.libelle = libelle.to_string();
        self
    }

    pub fn serie(mut self, serie: &str) -> Self {
        self.record.serie = serie.to_string();
        self
    }

    pub fn serie_grue(mut self, serie: &str) -> Self {
        self.record.serie_grue = serie.to_string();
        self
    }

    pub fn commentaire(mut self, commentaire: &str) -> Self {
        self.record.commentaire = commentaire.to_string();
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

/// Table of already-canonical records.
pub fn table_of(records: impl IntoIterator<Item = RecordBuilder>) -> Table {
    Table::from_records(records.into_iter().map(RecordBuilder::build).collect())
}

// ---------------------------------------------------------------------------
// SheetBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`RawSheet`] as a source reader would produce it.
///
/// Cells are given as `&str`; an empty string becomes an empty cell (`None`).
pub struct SheetBuilder {
    sheet: RawSheet,
}

impl SheetBuilder {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            sheet: RawSheet::new(headers.iter().map(|h| h.to_string()).collect()),
        }
    }

    /// Headers of the production workbook, in its column order.
    pub fn fleet() -> Self {
        Self::new(&[
            "AGENCE",
            "N° DE PARC HME",
            "N° PARC RZB",
            "Libellé",
            "IMMATRICULATION",
            "N° SERIE",
            "N° SERIE GRUE",
            "COMMENTAIRES",
        ])
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        let row = cells
            .iter()
            .map(|c| (!c.is_empty()).then(|| c.to_string()))
            .collect();
        self.sheet.push_row(row);
        self
    }

    pub fn build(self) -> RawSheet {
        self.sheet
    }

    pub fn table(self) -> Table {
        Table::from_sheet(&self.sheet)
    }
}
