//! Static fleet fixtures used across harnesses.

use std::path::{Path, PathBuf};

use parc_core::Table;

use crate::common::builders::SheetBuilder;

/// A small fleet in the production column layout.
///
/// Covers forward-filled agencies, a row without HME code, blank sentinels,
/// a crane with both serial numbers, and a shared keyword ("PELLE").
pub fn fleet_sheet() -> SheetBuilder {
    SheetBuilder::fleet()
        .row(&["PARIS", "H01100M", "X001L", "Pelle bassin", "AB-123-CD", "SN 42", "", ""])
        .row(&["", "H01200M", "X002L", "Pelle sur chenilles", "ab 456 cd", "", "", "nan"])
        .row(&["", "", "X999L", "Ligne sans HME", "", "", "", ""])
        .row(&["LYON", "H02200M", "", "Grue mobile", "EF-456-GH", "GR-7781", "LIEB 99", "révision mars"])
        .row(&["(vide)", "H03300M", "X003L", "Nacelle", "GH789IJ", "", "", ""])
}

pub fn fleet_table() -> Table {
    fleet_sheet().table()
}

/// The same fleet as `;`-separated text, header on the first line.
pub const FLEET_CSV: &str = "\
AGENCE;N° DE PARC HME;N° PARC RZB;Libellé;IMMATRICULATION;N° SERIE;N° SERIE GRUE;COMMENTAIRES
PARIS;H01100M;X001L;Pelle bassin;AB-123-CD;SN 42;;
;H01200M;X002L;Pelle sur chenilles;ab 456 cd;;;nan
;;X999L;Ligne sans HME;;;;
LYON;H02200M;;Grue mobile;EF-456-GH;GR-7781;LIEB 99;révision mars
(vide);H03300M;X003L;Nacelle;GH789IJ;;;
";

/// Write [`FLEET_CSV`] into `dir` and return its path.
pub fn write_fleet_csv(dir: &Path) -> PathBuf {
    let path = dir.join("parc.csv");
    std::fs::write(&path, FLEET_CSV).expect("write fixture csv");
    path
}
