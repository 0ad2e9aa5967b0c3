//! Detail card: the headline answer for the row under the results cursor,
//! then every field of that row.
//!
//! The headline depends on what the user typed: an HME code is answered with
//! the RZB code, an RZB code with the HME code, anything else with the RZB
//! code under a neutral label.

use crate::theme::Theme;
use parc_core::{headline, ClassifyRules, Record};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use super::results::ResultRow;

const EMPTY: &str = "—";

pub struct DetailCard<'a> {
    row: Option<&'a ResultRow>,
    rules: &'a ClassifyRules,
    /// Batch queries without any hit.
    not_found: &'a [String],
    theme: &'a Theme,
}

impl<'a> DetailCard<'a> {
    pub fn new(row: Option<&'a ResultRow>, rules: &'a ClassifyRules, theme: &'a Theme) -> Self {
        Self { row, rules, not_found: &[], theme }
    }

    pub fn not_found(mut self, not_found: &'a [String]) -> Self {
        self.not_found = not_found;
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        match self.row {
            Some(row) => {
                let kind = self.rules.classify(&row.query);
                let h = headline(&row.record, kind);
                lines.push(Line::from(vec![
                    Span::styled(format!(" {} ", h.label), self.theme.headline_badge),
                    Span::raw("  "),
                    self.value(h.value, self.theme.headline_value),
                ]));
                lines.push(Line::default());
                lines.extend(self.fields(&row.record));
            }
            None => lines.push(Line::from(Span::styled(
                "Type a fleet code, a plate or keywords, then Enter.",
                self.theme.detail_empty,
            ))),
        }

        if !self.not_found.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!("Not found ({})", self.not_found.len()),
                self.theme.status_error,
            )));
            lines.extend(
                self.not_found
                    .iter()
                    .map(|q| Line::from(format!("  {q}"))),
            );
        }
        lines
    }

    fn fields(&self, r: &'a Record) -> Vec<Line<'a>> {
        let field = |label: &'static str, value: &'a str, style: Style| {
            Line::from(vec![
                Span::styled(format!("{label:<14}"), self.theme.detail_label),
                self.value(value, style),
            ])
        };
        let bold = Style::default().add_modifier(Modifier::BOLD);
        vec![
            field("HME", &r.parc_hme, bold),
            field("RZB", &r.parc_rzb, bold),
            field("Immat", &r.immatriculation, Style::default()),
            field("Agence", &r.agence, self.theme.agence_style(&r.agence)),
            field("Libellé", &r.libelle, Style::default()),
            field("Commentaire", &r.commentaire, Style::default()),
            Line::default(),
            field("N° SERIE", &r.serie, Style::default()),
            field("N° SERIE GRUE", &r.serie_grue, Style::default()),
        ]
    }

    fn value(&self, value: &'a str, style: Style) -> Span<'a> {
        if value.is_empty() {
            Span::styled(EMPTY, self.theme.detail_empty)
        } else {
            Span::styled(value, style)
        }
    }
}

impl Widget for DetailCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title("Detail")
            .border_style(self.theme.border_unfocused);
        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .block(block)
            .render(area, buf);
    }
}
