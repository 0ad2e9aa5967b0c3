//! Delimited text reader (`.csv`, `.txt`).

use std::borrow::Cow;
use std::path::PathBuf;
use std::time::SystemTime;

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use parc_core::{LoadError, RawSheet, TableSource};

#[derive(Debug, Clone)]
pub struct DelimitedSource {
    pub path: PathBuf,
    pub delimiter: u8,
    /// 0-based header row; lines above it are skipped.
    pub header_row: usize,
}

impl DelimitedSource {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8, header_row: usize) -> Self {
        Self { path: path.into(), delimiter, header_row }
    }
}

impl TableSource for DelimitedSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<RawSheet, LoadError> {
        let bytes = std::fs::read(&self.path).map_err(|e| crate::io_error(&self.path, e))?;
        let text = decode(&bytes);
        if matches!(text, Cow::Owned(_)) {
            tracing::debug!(origin = %self.origin(), "not UTF-8, decoded as windows-1252");
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // rows may be shorter or longer than the header
            .delimiter(self.delimiter)
            .from_reader(text.as_bytes());

        let mut headers = Vec::new();
        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| self.error(e))?;
            let cells: Vec<String> = record.iter().map(str::to_string).collect();
            if i == self.header_row {
                headers = cells;
            } else if i > self.header_row {
                rows.push(cells.into_iter().map(|c| (!c.is_empty()).then_some(c)).collect());
            }
        }

        tracing::debug!(
            origin = %self.origin(),
            columns = headers.len(),
            rows = rows.len(),
            "delimited file read"
        );
        let mut sheet = RawSheet::new(headers);
        sheet.rows = rows;
        Ok(sheet)
    }

    fn modified(&self) -> Option<SystemTime> {
        crate::modified(&self.path)
    }
}

/// UTF-8 with or without a BOM, otherwise Windows-1252 (Excel's
/// semicolon CSV export on French systems).
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()),
    }
}

impl DelimitedSource {
    fn error(&self, e: csv::Error) -> LoadError {
        let reason = e.to_string();
        match e.into_kind() {
            csv::ErrorKind::Io(source) => crate::io_error(&self.path, source),
            _ => LoadError::Unreadable { origin: self.origin(), reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parc_core::Table;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn header_row_offset_and_ragged_rows() {
        let file = write("titre\n;\nAGENCE;N° DE PARC HME\nPARIS;H1\n;H2;extra\n");
        let sheet = DelimitedSource::new(file.path(), b';', 2).read().unwrap();
        assert_eq!(sheet.headers, ["AGENCE", "N° DE PARC HME"]);
        assert_eq!(
            sheet.rows,
            vec![
                vec![Some("PARIS".to_string()), Some("H1".to_string())],
                vec![None, Some("H2".to_string()), Some("extra".to_string())],
            ]
        );
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all("\u{feff}AGENCE;N° DE PARC HME\nA;H1\n".as_bytes()).unwrap();
        let sheet = DelimitedSource::new(file.path(), b';', 0).read().unwrap();
        assert_eq!(sheet.headers, ["AGENCE", "N° DE PARC HME"]);
    }

    #[test]
    fn windows_1252_export_loads() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"AGENCE;N\xB0 DE PARC HME;Libell\xE9\nPARIS;H01100M;Pelle \xE9lectrique\n")
            .unwrap();
        let sheet = DelimitedSource::new(file.path(), b';', 0).read().unwrap();
        assert_eq!(sheet.headers, ["AGENCE", "N° DE PARC HME", "Libellé"]);

        let table = Table::from_sheet(&sheet);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].parc_hme, "H01100M");
        assert_eq!(table.records()[0].libelle, "Pelle électrique");
    }

    #[test]
    fn decode_prefers_utf8() {
        assert!(matches!(decode("N° DE PARC".as_bytes()), Cow::Borrowed("N° DE PARC")));
        assert_eq!(decode(b"N\xB0 DE PARC"), "N° DE PARC");
    }

    #[test]
    fn file_shorter_than_header_row_is_empty() {
        let file = write("a;b\n");
        let sheet = DelimitedSource::new(file.path(), b';', 5).read().unwrap();
        assert!(sheet.headers.is_empty());
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DelimitedSource::new("/nonexistent/parc.csv", b';', 0).read().unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
