//! Spreadsheet reader (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`).

use std::path::PathBuf;
use std::time::SystemTime;

use calamine::{open_workbook_auto, Data, Reader};
use parc_core::{LoadError, RawSheet, TableSource};

#[derive(Debug, Clone)]
pub struct WorkbookSource {
    pub path: PathBuf,
    pub sheet: String,
    /// 0-based header row, counted from the top of the sheet.
    pub header_row: usize,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>, header_row: usize) -> Self {
        Self { path: path.into(), sheet: sheet.into(), header_row }
    }
}

impl TableSource for WorkbookSource {
    fn origin(&self) -> String {
        format!("{} [{}]", self.path.display(), self.sheet)
    }

    fn read(&self) -> Result<RawSheet, LoadError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| match e {
            calamine::Error::Io(source) => crate::io_error(&self.path, source),
            other => LoadError::Unreadable { origin: self.origin(), reason: other.to_string() },
        })?;

        let names = workbook.sheet_names();
        if !names.iter().any(|n| n == &self.sheet) {
            return Err(LoadError::SheetNotFound {
                path: self.path.clone(),
                sheet: self.sheet.clone(),
                available: names.join(", "),
            });
        }

        let range = workbook
            .worksheet_range(&self.sheet)
            .map_err(|e| LoadError::Unreadable { origin: self.origin(), reason: e.to_string() })?;

        // The range starts at the first non-empty cell; rows above it are blank.
        let first_row = range.start().map_or(0, |(row, _)| row as usize);
        let mut headers = Vec::new();
        let mut sheet_rows = Vec::new();
        for (offset, row) in range.rows().enumerate() {
            let absolute = first_row + offset;
            if absolute == self.header_row {
                headers = row.iter().map(|c| cell_text(c).unwrap_or_default()).collect();
            } else if absolute > self.header_row {
                sheet_rows.push(row.iter().map(cell_text).collect());
            }
        }

        tracing::debug!(
            origin = %self.origin(),
            first_row,
            header_row = self.header_row,
            columns = headers.len(),
            rows = sheet_rows.len(),
            "workbook read"
        );
        let mut sheet = RawSheet::new(headers);
        sheet.rows = sheet_rows;
        Ok(sheet)
    }

    fn modified(&self) -> Option<SystemTime> {
        crate::modified(&self.path)
    }
}

/// Stringify a cell. Whole-valued floats print without a fractional part,
/// so a code typed as `1100` does not come back as `1100.0`.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
