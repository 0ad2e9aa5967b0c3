//! parc-core: canonical fleet table and query engine.
//!
//! This crate exposes the lookup pipeline as public modules, plus the shared
//! types used by the source readers and the TUI.
//!
//! # Architecture
//!
//! ```text
//! TableSource ──► Loader ──► Table ──► Search ──► Present
//!                   │          │          │
//!                   │          │          └──► Batch ──► Export
//!                   └──────────┴──► TableProvider (atomic reload)
//! ```
//!
//! Everything below the provider is a pure function over an immutable
//! [`Table`]; the provider is the only place a table is ever replaced.

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod normalize;
pub mod present;
pub mod provider;
pub mod search;
pub mod table;
pub mod types;

pub use batch::{batch_search, BatchHit, BatchOutcome};
pub use config::Config;
pub use error::{ConfigError, ExportError, LoadError};
pub use export::{ExportFormat, ExportSheet};
pub use present::{classify, headline, ClassifyRules, Headline, HeadlineLabel, LookupKind};
pub use provider::{Snapshot, TableProvider, TableSource};
pub use search::{search, MatchMode, SearchOptions};
pub use table::{RawSheet, Table};
pub use types::{Column, Record};
