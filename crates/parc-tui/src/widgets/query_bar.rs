//! Query bar widget: text input plus the match-mode badge, at the bottom of
//! the screen.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor.
//!
//! `Enter` is handled by the app, which runs the query.

use crate::event::AppEvent;
use crate::theme::Theme;
use parc_core::SearchOptions;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct QueryBarState {
    pub query: String,
    /// Byte offset of the cursor within `query`.
    pub cursor: usize,
}

impl QueryBarState {
    pub fn handle(&mut self, event: &AppEvent) {
        if super::edit_line(&mut self.query, &mut self.cursor, event) {
            tracing::debug!(query = %self.query, cursor = self.cursor, "query edited");
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct QueryBar<'a> {
    state: &'a QueryBarState,
    options: SearchOptions,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> QueryBar<'a> {
    pub fn new(
        state: &'a QueryBarState,
        options: SearchOptions,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { state, options, focused, theme }
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        // The block adds 1-cell borders; text starts at (area.x+1, area.y+1).
        let col = self.state.query[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(1));
        (x, area.y + 1)
    }

    fn badge(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.options.mode),
            self.theme.mode_style(self.options.mode),
        )];
        if self.options.include_serials {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(" +serials ", self.theme.mode_style(self.options.mode)));
        }
        Line::from(spans).right_aligned()
    }
}

impl Widget for QueryBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title("Query")
            .border_style(self.theme.border(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(LayoutDir::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(22)])
            .split(inner);

        let query_line = if self.state.query.is_empty() && !self.focused {
            Line::from(Span::styled(
                "press / to search: HME, RZB, plate or keywords",
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(self.state.query.as_str())
        };
        Paragraph::new(query_line).render(chunks[0], buf);
        Paragraph::new(self.badge()).render(chunks[1], buf);
    }
}
