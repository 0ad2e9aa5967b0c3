//! File watcher for the table source.
//!
//! Watches the source's parent directory (editors and spreadsheet apps
//! usually replace the file rather than write it in place) and keeps only
//! the events that touch the source file itself.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

pub struct SourceWatcher {
    file: PathBuf,
    rx: Receiver<notify::Result<Event>>,
    // Dropping the watcher stops the events.
    _watcher: RecommendedWatcher,
}

impl SourceWatcher {
    pub fn new(path: &Path) -> notify::Result<Self> {
        let file = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        if file.file_name().is_none() {
            return Err(notify::Error::generic("source path has no file name"));
        }
        let dir = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(file = %file.display(), dir = %dir.display(), "watching source");

        Ok(Self { file, rx, _watcher: watcher })
    }

    /// Drain pending events; true if any of them touched the source file.
    /// The watch is non-recursive, so a file name match is enough.
    pub fn changed(&self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if self.is_relevant(&event) {
                        tracing::debug!(kind = ?event.kind, paths = ?event.paths, "source event");
                        changed = true;
                    }
                }
                Ok(Err(e)) => tracing::warn!(error = %e, "watch error"),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn is_relevant(&self, event: &Event) -> bool {
        matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) && event.paths.iter().any(|p| p.file_name() == self.file.file_name())
    }
}

impl std::fmt::Debug for SourceWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceWatcher").field("file", &self.file).finish_non_exhaustive()
    }
}
