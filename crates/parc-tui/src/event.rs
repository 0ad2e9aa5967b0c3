//! Semantic application events: crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Keybindings
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `q`, `Ctrl+c`           | `Quit`                     |
//! | `Tab`                   | `FocusNext`                |
//! | `/`                     | `QueryFocus`               |
//! | `Ctrl+e`                | `ToggleMode`               |
//! | `Ctrl+s`                | `ToggleSerials`            |
//! | `r`                     | `Reload`                   |
//! | `]` / `[`               | `NextTab` / `PrevTab`      |
//! | `PageUp`, `Ctrl+u`      | `PageUp`                   |
//! | `PageDown`, `Ctrl+d`    | `PageDown`                 |
//! | `g` / `G`               | `Top` / `Bottom`           |
//! | `↑` / `k`               | `Nav(Up)`                  |
//! | `↓` / `j`               | `Nav(Down)`                |
//! | `←` / `h`, `→` / `l`    | `Nav(Left)`, `Nav(Right)`  |
//! | printable char          | `Char(c)`                  |
//! | `Backspace`             | `Backspace`                |
//! | `Enter`                 | `Enter`                    |
//! | terminal resize         | `Resize(w, h)`             |
//!
//! ## Insert mode
//!
//! When the query bar or the command bar has focus the event loop calls
//! [`to_app_event_insert`] instead: letters that are shortcuts in normal mode
//! type themselves, arrow keys still navigate, and the `Ctrl` bindings stay
//! active.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Exit the application (or close the focused batch tab).
    Quit,
    FocusNext,
    QueryFocus,
    /// Switch between contains and exact matching.
    ToggleMode,
    /// Include or exclude serial numbers from matching.
    ToggleSerials,
    Reload,
    NextTab,
    PrevTab,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Nav(Direction),
    Char(char),
    Backspace,
    Enter,
    Resize(u16, u16),
    /// Dismiss the active modal (query bar focus, help popup, command bar).
    Escape,
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] (normal / navigation mode).
///
/// Returns `None` for events with no meaning for the application (mouse
/// events, unbound keys).
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] for text-input mode.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

/// Bindings shared by both modes.
fn map_common(key: &KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),
        Char('e') if key.modifiers == Mod::CONTROL => Some(AppEvent::ToggleMode),
        Char('s') if key.modifiers == Mod::CONTROL => Some(AppEvent::ToggleSerials),
        Char('u') if key.modifiers == Mod::CONTROL => Some(AppEvent::PageUp),
        Char('d') if key.modifiers == Mod::CONTROL => Some(AppEvent::PageDown),
        PageUp => Some(AppEvent::PageUp),
        PageDown => Some(AppEvent::PageDown),
        Up => Some(AppEvent::Nav(Direction::Up)),
        Down => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),
        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),
        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    if let Some(ev) = map_common(&key) {
        return Some(ev);
    }

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
        Char('/') if key.modifiers == Mod::NONE => Some(AppEvent::QueryFocus),
        Char('r') if key.modifiers == Mod::NONE => Some(AppEvent::Reload),
        Char(']') if key.modifiers == Mod::NONE => Some(AppEvent::NextTab),
        Char('[') if key.modifiers == Mod::NONE => Some(AppEvent::PrevTab),
        Char('g') if key.modifiers == Mod::NONE => Some(AppEvent::Top),
        // SHIFT may or may not be set depending on the terminal
        Char('G') => Some(AppEvent::Bottom),
        Char('k') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Up)),
        Char('j') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Down)),
        Char('h') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Left)),
        Char('l') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Right)),
        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }
        _ => None,
    }
}

fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    if let Some(ev) = map_common(&key) {
        return Some(ev);
    }

    match key.code {
        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
