//! Error types for parc-core.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a source into a raw grid.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sheet {sheet:?} not found in {path} (available: {available})")]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: String,
    },

    #[error("{origin} is unreadable: {reason}")]
    Unreadable { origin: String, reason: String },

    #[error("unsupported source format {extension:?} for {path} (expected xlsx, xlsm, xlsb, xls, ods, csv or txt)")]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("cannot write default config to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid classify pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("unknown classify preset {0:?} (expected default|strict)")]
    UnknownPreset(String),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failure while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
