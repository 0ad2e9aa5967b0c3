//! Help popup: centred floating overlay listing keybindings and commands.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

const BINDINGS: &[(&str, &str)] = &[
    ("q  /  Ctrl+c", "Quit / close batch tab"),
    ("Tab", "Cycle focus: results / query"),
    ("/", "Focus query bar"),
    ("Enter", "Run the query"),
    ("Escape", "Return focus to the results"),
    ("↑ k  /  ↓ j", "Move the results cursor"),
    ("PageUp / PageDown", "Scroll results by a page"),
    ("g  /  G", "First / last result"),
    ("]  /  [", "Next / previous tab"),
    ("Ctrl+e", "Toggle contains / exact"),
    ("Ctrl+s", "Toggle serial number matching"),
    ("r", "Reload the source table"),
    ("?", "Toggle this help popup"),
];

const COMMANDS: &[(&str, &str)] = &[
    (":q  /  :q!", "Close tab / quit"),
    (":mode contains|exact", "Set the match mode"),
    (":serials", "Toggle serial number matching"),
    (":batch <file>", "Look up every line of a file"),
    (":export [file]", "Export this tab (csv, json, html)"),
    (":reload", "Reload the source table"),
    (":theme <name>", "default, gruvbox"),
];

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (BINDINGS.len() + COMMANDS.len() + 3) as u16;
        let popup = centered_rect(72, height, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" parc: keybindings (? to close) ")
            .border_style(self.theme.border_focused);

        let inner = block.inner(popup);
        block.render(popup, buf);

        let row = |(key, desc): &(&str, &str)| {
            Line::from(vec![
                Span::styled(format!("  {:<22}", key), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(desc.to_string()),
            ])
        };

        let mut lines: Vec<Line> = BINDINGS.iter().map(row).collect();
        lines.push(Line::default());
        lines.extend(COMMANDS.iter().map(row));

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
