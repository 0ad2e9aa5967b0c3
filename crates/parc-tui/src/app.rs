//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. [`AppState`] holds
//! everything the widgets render and is driven without a terminal in tests.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent, Direction},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        detail::DetailCard,
        help::HelpPopup,
        query_bar::{QueryBar, QueryBarState},
        results::{ResultRow, Results, ResultsState},
        tab_bar::TabBar,
    },
};
use anyhow::Context;
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parc_core::{
    batch::batch_items,
    batch_search,
    config::Config,
    export::{self, display_columns, ExportFormat, ExportSheet, BATCH_FILE_NAME, RESULTS_FILE_NAME},
    search, ClassifyRules, MatchMode, SearchOptions, Snapshot, TableProvider,
};
use parc_sources::SourceWatcher;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    text::{Line, Span},
    Frame, Terminal,
};
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

// ---------------------------------------------------------------------------
// Focus + tab types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Results,
    QueryBar,
    /// Vim-style `:` command line is active.
    Command,
}

#[derive(Debug)]
pub enum TabKind {
    /// The interactive search tab. Always tab 0.
    Search { submitted: String },
    /// One lookup per line of a file.
    Batch {
        path: PathBuf,
        items: Vec<String>,
        not_found: Vec<String>,
    },
}

#[derive(Debug)]
pub struct TabState {
    pub label: String,
    pub kind: TabKind,
    pub results: ResultsState,
}

/// Last message shown on the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub error: bool,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub tabs: Vec<TabState>,
    pub active_tab: usize,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub query: QueryBarState,
    pub options: SearchOptions,
    pub rules: ClassifyRules,
    pub theme: Theme,
    pub config: Config,
    pub provider: TableProvider,
    pub snapshot: Arc<Snapshot>,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    pub status: Option<Status>,
    pub quit: bool,
}

impl AppState {
    pub fn new(config: Config, provider: TableProvider, theme: Theme) -> anyhow::Result<Self> {
        let rules = config.classify.rules().context("invalid [classify] settings")?;
        let snapshot = provider.snapshot();
        let search_tab = TabState {
            label: "search".to_string(),
            kind: TabKind::Search { submitted: String::new() },
            results: ResultsState::default(),
        };

        Ok(Self {
            tabs: vec![search_tab],
            active_tab: 0,
            focus: Focus::QueryBar,
            prev_focus: Focus::QueryBar,
            query: QueryBarState::default(),
            options: config.search.options(),
            rules,
            theme,
            config,
            provider,
            snapshot,
            show_help: false,
            command_bar: CommandBarState::default(),
            status: None,
            quit: false,
        })
    }

    pub fn active(&self) -> &TabState {
        &self.tabs[self.active_tab]
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status { text: text.into(), error: false });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!(message = %text, "status error");
        self.status = Some(Status { text, error: true });
    }

    /// Run the query bar's text in the search tab and switch to it.
    pub fn submit(&mut self) {
        let query = self.query.query.trim().to_string();
        if let TabKind::Search { submitted } = &mut self.tabs[0].kind {
            *submitted = query;
        }
        self.active_tab = 0;
        self.rerun(0);
        tracing::debug!(query = %self.query.query, hits = self.tabs[0].results.rows.len(), "query submitted");
    }

    /// Recompute a tab's rows against the current snapshot and options.
    pub fn rerun(&mut self, index: usize) {
        let table = &self.snapshot.table;
        let options = self.options;
        let tab = &mut self.tabs[index];
        match &mut tab.kind {
            TabKind::Search { submitted } => {
                if submitted.is_empty() {
                    tab.results = ResultsState::default();
                    return;
                }
                let rows = search(table, submitted, options)
                    .into_iter()
                    .map(|record| ResultRow { query: submitted.clone(), record: record.clone() })
                    .collect();
                tab.results.set_rows(rows);
            }
            TabKind::Batch { items, not_found, .. } => {
                let outcome = batch_search(table, items.iter(), options);
                let rows = outcome
                    .iter_hits()
                    .map(|hit| ResultRow { query: hit.query.to_string(), record: hit.record.clone() })
                    .collect();
                *not_found = outcome.not_found;
                tab.results.set_rows(rows);
            }
        }
    }

    fn rerun_all(&mut self) {
        for i in 0..self.tabs.len() {
            self.rerun(i);
        }
    }

    pub fn set_mode(&mut self, mode: MatchMode) {
        self.options.mode = mode;
        self.rerun_all();
        self.info(format!("mode {mode}"));
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.options.mode.toggled());
    }

    pub fn toggle_serials(&mut self) {
        self.options.include_serials = !self.options.include_serials;
        self.rerun_all();
        let state = if self.options.include_serials { "on" } else { "off" };
        self.info(format!("serial numbers {state}"));
    }

    /// Reload the table unconditionally.
    pub fn reload(&mut self) {
        match self.provider.reload() {
            Ok(snapshot) => self.apply_snapshot(snapshot, "reloaded"),
            Err(e) => self.error(format!("reload failed: {e}")),
        }
    }

    /// Reload if the source changed on disk since the last load.
    pub fn reload_if_changed(&mut self) {
        match self.provider.reload_if_changed() {
            Ok(Some(snapshot)) => self.apply_snapshot(snapshot, "source changed, reloaded"),
            Ok(None) => {}
            Err(e) => self.error(format!("reload failed: {e}")),
        }
    }

    fn apply_snapshot(&mut self, snapshot: Arc<Snapshot>, what: &str) {
        self.snapshot = snapshot;
        self.rerun_all();
        let message = format!(
            "{what}: {} rows at {}",
            self.snapshot.table.len(),
            self.snapshot.loaded_at.with_timezone(&chrono::Local).format("%H:%M:%S")
        );
        self.info(message);
    }

    /// Open a batch tab for the lines of `path` and focus it.
    pub fn open_batch(&mut self, path: &Path) {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => return self.error(format!("cannot read {}: {e}", path.display())),
        };
        let items = batch_items(contents.lines());
        if items.is_empty() {
            return self.error(format!("{} has no queries", path.display()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.tabs.push(TabState {
            label: format!("batch {name}"),
            kind: TabKind::Batch { path: path.to_path_buf(), items, not_found: Vec::new() },
            results: ResultsState::tagged(),
        });
        self.active_tab = self.tabs.len() - 1;
        self.focus = Focus::Results;
        self.rerun(self.active_tab);

        if let TabKind::Batch { items, not_found, .. } = &self.active().kind {
            let message = format!(
                "batch: {} queries, {} hits, {} not found",
                items.len(),
                self.active().results.rows.len(),
                not_found.len()
            );
            self.info(message);
        }
    }

    /// Export the active tab. Without a path, the default file name is used
    /// in the current directory.
    pub fn export(&mut self, path: Option<PathBuf>) {
        let table = &self.snapshot.table;
        let tab = self.active();
        let (sheet, default_name) = match &tab.kind {
            TabKind::Search { .. } => {
                let records: Vec<_> = tab.results.rows.iter().map(|r| &r.record).collect();
                (ExportSheet::from_results(table, &records), RESULTS_FILE_NAME)
            }
            TabKind::Batch { .. } => (
                ExportSheet::from_tagged(
                    table,
                    tab.results.rows.iter().map(|r| (r.query.as_str(), &r.record)),
                ),
                BATCH_FILE_NAME,
            ),
        };
        if sheet.is_empty() {
            return self.error("nothing to export");
        }

        let path = path.unwrap_or_else(|| PathBuf::from(default_name));
        let format = ExportFormat::from_path(&path);
        match export::write_to_path(&path, format, &sheet) {
            Ok(()) => self.info(format!("exported {} rows to {}", sheet.rows.len(), path.display())),
            Err(e) => self.error(format!("export failed: {e}")),
        }
    }

    /// Close the active batch tab, or quit from the search tab.
    pub fn close_tab_or_quit(&mut self) {
        if self.active_tab == 0 {
            tracing::debug!("quit");
            self.quit = true;
        } else {
            tracing::debug!(tab = self.active_tab, "closing tab");
            self.tabs.remove(self.active_tab);
            self.active_tab = self.active_tab.saturating_sub(1);
        }
    }

    fn switch_tab(&mut self, forward: bool) {
        let n = self.tabs.len();
        self.active_tab = if forward {
            (self.active_tab + 1) % n
        } else {
            (self.active_tab + n - 1) % n
        };
        tracing::debug!(tab = self.active_tab, "switched tab");
    }

    /// Route one event to the focused widget or the matching action.
    pub fn handle(&mut self, ev: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(ev, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return;
        }

        // Command mode intercepts all events.
        if self.focus == Focus::Command {
            match ev {
                AppEvent::Escape => {
                    tracing::debug!("command bar cancelled");
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                }
                AppEvent::Enter => match Command::parse(&self.command_bar.input) {
                    Ok(cmd) => {
                        tracing::debug!(command = ?cmd, "executing command");
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                        execute_command(self, cmd);
                    }
                    Err(msg) if msg.is_empty() => {
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                    }
                    Err(msg) => self.command_bar.error = Some(msg),
                },
                AppEvent::Quit => self.quit = true,
                other => self.command_bar.handle(&other),
            }
            return;
        }

        match ev {
            AppEvent::Char('?') if self.focus != Focus::QueryBar => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }
            AppEvent::Char(':') if self.focus != Focus::QueryBar => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }
            AppEvent::Quit => self.close_tab_or_quit(),
            AppEvent::Escape => {
                if self.focus == Focus::QueryBar {
                    self.focus = Focus::Results;
                }
            }
            AppEvent::FocusNext => {
                self.focus = match self.focus {
                    Focus::Results => Focus::QueryBar,
                    Focus::QueryBar | Focus::Command => Focus::Results,
                };
                tracing::debug!(to = ?self.focus, "focus cycle");
            }
            AppEvent::QueryFocus => self.focus = Focus::QueryBar,
            AppEvent::ToggleMode => self.toggle_mode(),
            AppEvent::ToggleSerials => self.toggle_serials(),
            AppEvent::Reload => self.reload(),
            AppEvent::NextTab => self.switch_tab(true),
            AppEvent::PrevTab => self.switch_tab(false),
            AppEvent::Enter if self.focus == Focus::QueryBar => self.submit(),
            // Vertical movement always drives the results list, even while typing.
            ev @ (AppEvent::Nav(Direction::Up)
            | AppEvent::Nav(Direction::Down)
            | AppEvent::PageUp
            | AppEvent::PageDown) => self.tabs[self.active_tab].results.handle(&ev),
            AppEvent::Resize(_, _) => {}
            other => match self.focus {
                Focus::QueryBar => self.query.handle(&other),
                Focus::Results => self.tabs[self.active_tab].results.handle(&other),
                Focus::Command => {}
            },
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
    watcher: Option<SourceWatcher>,
}

impl App {
    pub fn new(state: AppState, watcher: Option<SourceWatcher>) -> Self {
        App { state, watcher }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(50))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.state.handle(ev);
                        }
                    }
                }
            } else if self.watcher.as_ref().is_some_and(SourceWatcher::changed) {
                self.state.reload_if_changed();
            }
        }
        Ok(())
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::QueryBar | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line tab bar | body | 3-line query bar
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .split(area);

    let pct = state.config.ui.results_pane_width_pct;
    let horiz = Layout::default()
        .direction(LayoutDir::Horizontal)
        .constraints([Constraint::Percentage(pct), Constraint::Fill(1)])
        .split(vert[1]);

    let tab = state.active();
    let origin = format!("{} ({} rows)", state.snapshot.origin, state.snapshot.table.len());

    frame.render_widget(TabBar::new(&state.tabs, state.active_tab, &origin, &state.theme), vert[0]);

    let status = state.status.as_ref().map(|s| {
        let style = if s.error { state.theme.status_error } else { state.theme.status_info };
        Line::from(Span::styled(format!(" {} ", s.text), style))
    });
    frame.render_widget(
        Results::new(&tab.results, state.focus == Focus::Results, &state.theme)
            .columns(display_columns(&state.snapshot.table))
            .status(status),
        horiz[0],
    );

    let not_found: &[String] = match &tab.kind {
        TabKind::Batch { not_found, .. } => not_found,
        TabKind::Search { .. } => &[],
    };
    frame.render_widget(
        DetailCard::new(tab.results.selected(), &state.rules, &state.theme).not_found(not_found),
        horiz[1],
    );

    let query_bar = QueryBar::new(&state.query, state.options, state.focus == Focus::QueryBar, &state.theme);
    let (cx, cy) = query_bar.cursor_position(vert[2]);
    frame.render_widget(query_bar, vert[2]);

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    if state.focus == Focus::QueryBar {
        frame.set_cursor_position((cx, cy));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
