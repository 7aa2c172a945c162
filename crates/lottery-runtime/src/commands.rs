//! # Operator Commands
//!
//! One command per stdin line.
//!
//! | Line | Command |
//! |------|---------|
//! | `deck <loop\|exhaust> <item>\|<item>\|...` | submit a deck |
//! | `draw <1-4>` | draw for a player |
//! | `reset [confirm]` | reset the game |
//! | `layout <x> <y> <scale>` | move the displays |
//! | `reload` | hard refresh every display |
//! | `mode <loop\|exhaust>` | change the selected mode |
//! | `status`, `metrics`, `help`, `quit` | |
//!
//! Deck items are separated by `|` since a line cannot hold newlines.

use std::str::FromStr;

use shared_types::DrawMode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown draw mode: {0}")]
    Mode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SubmitDeck { mode: DrawMode, text: String },
    Draw(u8),
    Reset { confirm: bool },
    Layout { x: f64, y: f64, scale: f64 },
    Reload,
    SelectMode(DrawMode),
    Status,
    Metrics,
    Help,
    Quit,
}

pub const HELP: &str = "\
deck <loop|exhaust> <item>|<item>|...   submit a deck and start a new game
draw <1-4>                               draw for a player
reset confirm                            clear used items and counts
layout <x> <y> <scale>                   move the displays
reload                                   hard refresh every display
mode <loop|exhaust>                      select the draw mode
status | metrics | help | quit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        match verb.to_ascii_lowercase().as_str() {
            "deck" => {
                let (mode, items) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("deck <loop|exhaust> <item>|<item>|..."))?;
                Ok(Command::SubmitDeck {
                    mode: mode_arg(mode)?,
                    text: items.split('|').collect::<Vec<_>>().join("\n"),
                })
            }
            "draw" => rest
                .parse::<u8>()
                .map(Command::Draw)
                .map_err(|_| CommandError::Usage("draw <1-4>")),
            "reset" => Ok(Command::Reset {
                confirm: rest.eq_ignore_ascii_case("confirm"),
            }),
            "layout" => {
                let mut values = rest.split_whitespace().map(lenient_f64);
                let x = values.next().unwrap_or(f64::NAN);
                let y = values.next().unwrap_or(f64::NAN);
                let scale = values.next().unwrap_or(f64::NAN);
                Ok(Command::Layout { x, y, scale })
            }
            "reload" => Ok(Command::Reload),
            "mode" => Ok(Command::SelectMode(mode_arg(rest)?)),
            "status" => Ok(Command::Status),
            "metrics" => Ok(Command::Metrics),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn mode_arg(raw: &str) -> Result<DrawMode, CommandError> {
    raw.parse().map_err(|_| CommandError::Mode(raw.to_string()))
}

/// Unparseable numbers become NaN; the control surface then falls back to
/// the layout defaults.
fn lenient_f64(raw: &str) -> f64 {
    raw.parse().unwrap_or(f64::NAN)
}
