//! parc TUI: ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

use std::path::Path;

use parc_core::{config::Config, TableProvider};
use parc_sources::SourceWatcher;

pub use app::{App, AppState};

/// Start the TUI over an already loaded table.
///
/// When `watch` is given and `[ui] watch_source` is on, edits to that file
/// reload the table in place.
pub fn run(config: Config, provider: TableProvider, watch: Option<&Path>) -> anyhow::Result<()> {
    let theme = theme::Theme::by_name(&config.ui.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.ui.theme, "unknown theme, using default");
        theme::Theme::load_default()
    });

    let watcher = match watch.filter(|_| config.ui.watch_source) {
        Some(path) => match SourceWatcher::new(path) {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot watch source");
                None
            }
        },
        None => None,
    };

    let state = AppState::new(config, provider, theme)?;
    App::new(state, watcher).run()
}
