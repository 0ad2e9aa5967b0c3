//! parc-sources: table source readers for parc.
//!
//! Each reader turns one file into the [`parc_core::RawSheet`] the loader
//! consumes. [`open_source`] picks the reader from the file extension.

pub mod delimited;
pub mod watch;
pub mod workbook;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parc_core::config::SourceConfig;
use parc_core::{LoadError, RawSheet, TableSource};

pub use delimited::DelimitedSource;
pub use watch::SourceWatcher;
pub use workbook::WorkbookSource;

/// A source picked at runtime.
#[derive(Debug, Clone)]
pub enum Source {
    Workbook(WorkbookSource),
    Delimited(DelimitedSource),
}

impl Source {
    pub fn path(&self) -> &Path {
        match self {
            Source::Workbook(s) => &s.path,
            Source::Delimited(s) => &s.path,
        }
    }
}

impl TableSource for Source {
    fn origin(&self) -> String {
        match self {
            Source::Workbook(s) => s.origin(),
            Source::Delimited(s) => s.origin(),
        }
    }

    fn read(&self) -> Result<RawSheet, LoadError> {
        match self {
            Source::Workbook(s) => s.read(),
            Source::Delimited(s) => s.read(),
        }
    }

    fn modified(&self) -> Option<SystemTime> {
        match self {
            Source::Workbook(s) => s.modified(),
            Source::Delimited(s) => s.modified(),
        }
    }
}

/// Pick a reader for `config.path` by extension.
///
/// Workbooks use `sheet` and `header_row`; delimited files use `delimiter`
/// and `header_row`.
pub fn open_source(config: &SourceConfig) -> Result<Source, LoadError> {
    let path = config.path.clone();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Source::Workbook(WorkbookSource {
            path,
            sheet: config.sheet.clone(),
            header_row: config.header_row,
        })),
        "csv" | "txt" => {
            let delimiter = config.delimiter_byte().map_err(|e| LoadError::Unreadable {
                origin: path.display().to_string(),
                reason: e.to_string(),
            })?;
            Ok(Source::Delimited(DelimitedSource {
                path,
                delimiter,
                header_row: config.header_row,
            }))
        }
        _ => Err(LoadError::UnsupportedFormat { path, extension }),
    }
}

pub(crate) fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    LoadError::Io { path: PathBuf::from(path), source }
}
