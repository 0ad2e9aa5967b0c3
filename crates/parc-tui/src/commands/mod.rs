//! `:` commands: parsing and execution against the application state.
//!
//! | Command | Action |
//! |---------|--------|
//! | `q`, `quit` | Close the batch tab, or quit from the search tab |
//! | `q!`, `quit!` | Quit |
//! | `help` | Toggle the help popup |
//! | `theme <name>` | Switch theme (`default`, `gruvbox`) |
//! | `mode <contains\|exact>` | Set the match mode |
//! | `serials` | Toggle serial number matching |
//! | `reload` | Reload the source table |
//! | `export [path]` | Export the active tab (format from the extension) |
//! | `batch <path>` | Open a batch tab for a newline-delimited file |

use std::path::PathBuf;

use parc_core::MatchMode;

use crate::{app::AppState, theme::Theme};

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Exit,
    Help,
    Theme(String),
    Mode(MatchMode),
    Serials,
    Reload,
    Export(Option<PathBuf>),
    Batch(PathBuf),
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "q!" | "quit!" => Ok(Command::Exit),
            "help" => Ok(Command::Help),
            "serials" => Ok(Command::Serials),
            "reload" => Ok(Command::Reload),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            "mode" => match rest {
                "" => Err("usage: mode <contains|exact>".to_string()),
                m => m.parse().map(Command::Mode),
            },
            "export" | "w" => Ok(Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest)))),
            "batch" => {
                if rest.is_empty() {
                    Err("usage: batch <file>".to_string())
                } else {
                    Ok(Command::Batch(PathBuf::from(rest)))
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) {
    match cmd {
        Command::Quit => s.close_tab_or_quit(),
        Command::Exit => s.quit = true,
        Command::Help => s.show_help = !s.show_help,
        Command::Theme(name) => match Theme::by_name(&name) {
            Some(theme) => {
                s.theme = theme;
                s.info(format!("theme {name}"));
            }
            None => s.error(format!("unknown theme {name:?}")),
        },
        Command::Mode(mode) => s.set_mode(mode),
        Command::Serials => s.toggle_serials(),
        Command::Reload => s.reload(),
        Command::Export(path) => s.export(path),
        Command::Batch(path) => s.open_batch(&path),
    }
}
