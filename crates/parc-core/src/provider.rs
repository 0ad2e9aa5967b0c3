//! Table provider: owns the current table snapshot and replaces it whole.
//!
//! Readers call [`TableProvider::snapshot`] and keep the returned `Arc` for
//! as long as they need a consistent view. A reload builds the new table
//! without holding the lock and then swaps the pointer in one write, so a
//! reader sees either the old table or the new one.

use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::error::LoadError;
use crate::table::{RawSheet, Table};

/// Anything that can produce a raw grid: a workbook, a CSV file, a test
/// fixture.
pub trait TableSource: Send + Sync {
    /// Human-readable description, used in logs and the status line.
    fn origin(&self) -> String;

    fn read(&self) -> Result<RawSheet, LoadError>;

    /// Last modification stamp, when the source has one.
    fn modified(&self) -> Option<SystemTime> {
        None
    }
}

/// One loaded table and where it came from.
#[derive(Debug)]
pub struct Snapshot {
    pub table: Table,
    pub loaded_at: DateTime<Utc>,
    pub origin: String,
    pub modified: Option<SystemTime>,
}

impl Snapshot {
    fn build(source: &dyn TableSource) -> Result<Self, LoadError> {
        // Stamp before reading so a write during the read triggers another reload.
        let modified = source.modified();
        let sheet = source.read()?;
        let table = Table::from_sheet(&sheet);
        Ok(Self {
            table,
            loaded_at: Utc::now(),
            origin: source.origin(),
            modified,
        })
    }
}

pub struct TableProvider {
    source: Box<dyn TableSource>,
    current: RwLock<Arc<Snapshot>>,
}

impl std::fmt::Debug for TableProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableProvider")
            .field("origin", &self.source.origin())
            .finish_non_exhaustive()
    }
}

impl TableProvider {
    /// First load. An error here means there is nothing to serve.
    pub fn load(source: impl TableSource + 'static) -> Result<Self, LoadError> {
        let source: Box<dyn TableSource> = Box::new(source);
        let snapshot = Snapshot::build(source.as_ref())?;
        tracing::info!(origin = %snapshot.origin, rows = snapshot.table.len(), "table loaded");
        Ok(Self {
            source,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Rebuild from the source. On failure the previous snapshot is kept and
    /// the error returned.
    pub fn reload(&self) -> Result<Arc<Snapshot>, LoadError> {
        let snapshot = match Snapshot::build(self.source.as_ref()) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                tracing::warn!(origin = %self.source.origin(), error = %e, "reload failed, keeping previous table");
                return Err(e);
            }
        };
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&snapshot);
        tracing::info!(origin = %snapshot.origin, rows = snapshot.table.len(), "table reloaded");
        Ok(snapshot)
    }

    /// Reload only when the source's modification stamp moved past the one
    /// recorded at the last load. Returns `Ok(None)` when nothing changed.
    pub fn reload_if_changed(&self) -> Result<Option<Arc<Snapshot>>, LoadError> {
        let current = self.snapshot().modified;
        match (current, self.source.modified()) {
            (Some(old), Some(new)) if new <= old => Ok(None),
            (None, None) => Ok(None),
            _ => self.reload().map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a one-row sheet whose HME code is the read counter.
    #[derive(Default)]
    struct Counting {
        reads: AtomicUsize,
        fail: std::sync::atomic::AtomicBool,
    }

    impl TableSource for &'static Counting {
        fn origin(&self) -> String {
            "counting".to_string()
        }

        fn read(&self) -> Result<RawSheet, LoadError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(LoadError::Unreadable { origin: self.origin(), reason: "boom".into() });
            }
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            let mut sheet = RawSheet::new(vec!["N° DE PARC HME".into()]);
            sheet.push_row(vec![Some(format!("H{n}"))]);
            Ok(sheet)
        }
    }

    fn leak() -> &'static Counting {
        Box::leak(Box::new(Counting::default()))
    }

    #[test]
    fn reload_swaps_and_old_snapshot_survives() {
        let source = leak();
        let provider = TableProvider::load(source).unwrap();
        let before = provider.snapshot();
        provider.reload().unwrap();
        assert_eq!(before.table.records()[0].parc_hme, "H0");
        assert_eq!(provider.snapshot().table.records()[0].parc_hme, "H1");
    }

    #[test]
    fn failed_reload_keeps_previous_table() {
        let source = leak();
        let provider = TableProvider::load(source).unwrap();
        source.fail.store(true, Ordering::SeqCst);
        assert!(provider.reload().is_err());
        assert_eq!(provider.snapshot().table.records()[0].parc_hme, "H0");
    }

    #[test]
    fn unstamped_source_never_reloads_on_change_check() {
        let provider = TableProvider::load(leak()).unwrap();
        assert!(provider.reload_if_changed().unwrap().is_none());
    }
}
