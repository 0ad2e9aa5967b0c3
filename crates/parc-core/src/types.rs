//! Core types for parc-core.
//!
//! This module defines the canonical [`Record`] (one row of the fleet table)
//! and the [`Column`] vocabulary shared by the loader, the query engine and
//! the exporters.

/// One row of the canonical fleet table.
///
/// Values are stored already normalized by the loader: codes are trimmed and
/// uppercased, free text is trimmed, and blank sentinels (`NAN`, `(VIDE)`, …)
/// are stored as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Agency (grouping label), forward-filled from the previous row.
    pub agence: String,
    /// HME fleet code. Never blank in a loaded table.
    pub parc_hme: String,
    /// RZB fleet code, possibly blank.
    pub parc_rzb: String,
    /// Free-text description, case preserved.
    pub libelle: String,
    /// Registration plate as written in the source (uppercased).
    pub immatriculation: String,
    /// `immatriculation` with every non-alphanumeric character removed.
    pub imm_norm: String,
    /// Machine serial number.
    pub serie: String,
    /// Crane serial number.
    pub serie_grue: String,
    pub commentaire: String,
}

impl Record {
    /// Borrow the value held in `column`.
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Agence => &self.agence,
            Column::ParcHme => &self.parc_hme,
            Column::ParcRzb => &self.parc_rzb,
            Column::Libelle => &self.libelle,
            Column::Immatriculation => &self.immatriculation,
            Column::ImmNorm => &self.imm_norm,
            Column::Serie => &self.serie,
            Column::SerieGrue => &self.serie_grue,
            Column::Commentaire => &self.commentaire,
        }
    }
}

/// A canonical column of the fleet table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Agence,
    ParcHme,
    ParcRzb,
    Libelle,
    Immatriculation,
    ImmNorm,
    Serie,
    SerieGrue,
    Commentaire,
}

impl Column {
    /// Every column, in canonical order.
    pub const ALL: [Column; 9] = [
        Column::Agence,
        Column::ParcHme,
        Column::ParcRzb,
        Column::Libelle,
        Column::Immatriculation,
        Column::ImmNorm,
        Column::Serie,
        Column::SerieGrue,
        Column::Commentaire,
    ];

    /// Canonical header name, as written by the exporters.
    pub fn name(self) -> &'static str {
        match self {
            Column::Agence => "AGENCE",
            Column::ParcHme => "PARC_HME",
            Column::ParcRzb => "PARC_RZB",
            Column::Libelle => "LIBELLE",
            Column::Immatriculation => "IMMATRICULATION",
            Column::ImmNorm => "IMM_NORM",
            Column::Serie => "N° SERIE",
            Column::SerieGrue => "N° SERIE GRUE",
            Column::Commentaire => "COMMENTAIRE",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
