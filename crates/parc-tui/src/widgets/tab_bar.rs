//! Tab bar widget: the strip of open tabs at the top of the screen.

use crate::app::TabState;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Tabs, Widget},
};

/// Renders the 1-line strip of open tabs, with the table origin and
/// keybinding hints right-aligned in the same row.
pub struct TabBar<'a> {
    tabs: &'a [TabState],
    active: usize,
    origin: &'a str,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [TabState], active: usize, origin: &'a str, theme: &'a Theme) -> Self {
        Self { tabs, active, origin, theme }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let labels: Vec<Line> = self
            .tabs
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!(" {}:{} ", i + 1, tab.label)))
            .collect();

        Tabs::new(labels)
            .select(self.active)
            .highlight_style(self.theme.headline_badge)
            .divider("")
            .render(area, buf);

        let hint = format!(" {}  q:quit  ?:help ", self.origin);
        let hint_x = area.right().saturating_sub(hint.chars().count() as u16);
        buf.set_string(hint_x, area.y, hint, Style::default().add_modifier(Modifier::DIM));
    }
}
