//! Results list: the matching rows, with a cursor picking the one shown in
//! the detail card.
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k`, `↓` / `j` | Move the cursor one row |
//! | `PageUp` / `PageDown` | Move the cursor one page |
//! | `g` / `G` | First / last row |

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use parc_core::{export::display_columns, Column, Record};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Cell as TableCell, Row, StatefulWidget, Table, TableState, Widget},
};

/// One row of the list and the query that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub query: String,
    pub record: Record,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ResultsState {
    pub rows: Vec<ResultRow>,
    /// Index into `rows` of the highlighted row.
    pub cursor: usize,
    /// Show the originating query as the first column (batch tabs).
    pub tagged: bool,
    /// Set once a query ran, so an empty list reads "no result".
    pub searched: bool,
    offset: Cell<usize>,
    last_height: Cell<usize>,
}

impl ResultsState {
    pub fn tagged() -> Self {
        Self { tagged: true, ..Self::default() }
    }

    /// Replace the rows and move the cursor back to the top.
    pub fn set_rows(&mut self, rows: Vec<ResultRow>) {
        self.rows = rows;
        self.cursor = 0;
        self.searched = true;
        self.offset.set(0);
    }

    pub fn selected(&self) -> Option<&ResultRow> {
        self.rows.get(self.cursor)
    }

    fn page(&self) -> usize {
        self.last_height.get().max(1)
    }

    pub fn handle(&mut self, event: &AppEvent) {
        let last = self.rows.len().saturating_sub(1);
        let before = self.cursor;
        match event {
            AppEvent::Nav(Direction::Up) => self.cursor = self.cursor.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => self.cursor = (self.cursor + 1).min(last),
            AppEvent::PageUp => self.cursor = self.cursor.saturating_sub(self.page()),
            AppEvent::PageDown => self.cursor = (self.cursor + self.page()).min(last),
            AppEvent::Top => self.cursor = 0,
            AppEvent::Bottom => self.cursor = last,
            _ => return,
        }
        if self.cursor != before {
            tracing::debug!(cursor = self.cursor, rows = self.rows.len(), "results: cursor moved");
        }
    }

    /// "n result(s)" / "no result", or nothing before the first query.
    pub fn summary(&self) -> Option<String> {
        match self.rows.len() {
            _ if !self.searched => None,
            0 => Some("no result".to_string()),
            1 => Some("1 result".to_string()),
            n => Some(format!("{n} results")),
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

fn column_width(column: Column) -> Constraint {
    match column {
        Column::Agence => Constraint::Length(14),
        Column::Immatriculation => Constraint::Length(11),
        Column::Libelle => Constraint::Min(24),
        Column::Commentaire => Constraint::Min(16),
        _ => Constraint::Length(10),
    }
}

pub struct Results<'a> {
    state: &'a ResultsState,
    /// Display columns of the loaded table, as exported.
    columns: Vec<Column>,
    focused: bool,
    /// Right-aligned status message (reload, export, errors).
    status: Option<Line<'a>>,
    theme: &'a Theme,
}

impl<'a> Results<'a> {
    pub fn new(state: &'a ResultsState, focused: bool, theme: &'a Theme) -> Self {
        let columns = display_columns(&parc_core::Table::default());
        Self { state, focused, columns, status: None, theme }
    }

    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn status(mut self, status: Option<Line<'a>>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for Results<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::bordered()
            .title("Results")
            .border_style(self.theme.border(self.focused));
        if let Some(summary) = self.state.summary() {
            block = block.title_bottom(Line::from(format!(" {summary} ")));
        }
        if let Some(status) = self.status {
            block = block.title_bottom(status.right_aligned());
        }

        // Header row takes one line.
        let inner_height = block.inner(area).height.saturating_sub(1) as usize;
        self.state.last_height.set(inner_height);

        let mut header: Vec<TableCell> = Vec::new();
        let mut widths: Vec<Constraint> = Vec::new();
        if self.state.tagged {
            header.push(TableCell::from("RECHERCHE"));
            widths.push(Constraint::Length(12));
        }
        for &column in &self.columns {
            header.push(TableCell::from(column.name()));
            widths.push(column_width(column));
        }

        let rows = self.state.rows.iter().map(|row| {
            let mut cells: Vec<TableCell> = Vec::with_capacity(self.columns.len() + 1);
            if self.state.tagged {
                cells.push(TableCell::from(row.query.as_str()));
            }
            for &column in &self.columns {
                let value = row.record.get(column);
                let style = match column {
                    Column::Agence => self.theme.agence_style(value),
                    _ => Style::default(),
                };
                cells.push(TableCell::from(Span::styled(value, style)));
            }
            Row::new(cells)
        });

        let table = Table::new(rows, widths)
            .header(Row::new(header).style(self.theme.table_header))
            .row_highlight_style(self.theme.table_selected)
            .column_spacing(1)
            .block(block);

        let mut table_state = TableState::default()
            .with_offset(self.state.offset.get())
            .with_selected((!self.state.rows.is_empty()).then_some(self.state.cursor));
        StatefulWidget::render(table, area, buf, &mut table_state);
        self.state.offset.set(table_state.offset());
    }
}
