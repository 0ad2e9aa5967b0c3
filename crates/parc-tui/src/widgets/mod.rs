//! Ratatui widgets for the parc TUI.

pub mod command_bar;
pub mod detail;
pub mod help;
pub mod query_bar;
pub mod results;
pub mod tab_bar;

use crate::event::{AppEvent, Direction};

/// Single-line text editing shared by the query bar and the command bar.
///
/// `cursor` is a byte offset into `text`, always on a char boundary.
/// Returns true when the event was consumed.
pub(crate) fn edit_line(text: &mut String, cursor: &mut usize, event: &AppEvent) -> bool {
    match event {
        AppEvent::Char(c) => {
            text.insert(*cursor, *c);
            *cursor += c.len_utf8();
        }
        AppEvent::Backspace => {
            if let Some((prev, _)) = text[..*cursor].char_indices().last() {
                text.remove(prev);
                *cursor = prev;
            }
        }
        AppEvent::Nav(Direction::Left) => {
            if let Some((prev, _)) = text[..*cursor].char_indices().last() {
                *cursor = prev;
            }
        }
        AppEvent::Nav(Direction::Right) => {
            if let Some(c) = text[*cursor..].chars().next() {
                *cursor += c.len_utf8();
            }
        }
        _ => return false,
    }
    true
}
