//! Command parsing for the interactive screener
//!
//! A small hand-written parser shared by the REPL and the one-shot CLI, so
//! both drive the filter cascade through the same [`Command`] values.

use crate::dataset::Column;
use crate::filter::{BoundSide, Preset};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Redraw the table: `show`
    Show,
    /// Select a segment: `segment <name|todos>`
    Segment { name: Option<String> },
    /// Edit a range bound: `set <field> <min|max> <value>`
    Set {
        column: Column,
        side: BoundSide,
        value: String,
    },
    /// Remove a range bound: `unset <field> <min|max>`
    Unset { column: Column, side: BoundSide },
    /// Apply a named preset: `preset <name>`
    Preset { preset: Preset },
    /// Unset every range bound: `clear`
    Clear,
    /// Tickers of the active segment: `tickers`
    Tickers,
    /// Available segments: `segments`
    Segments,
    /// Active segment and bounds: `state`
    State,
    Help,
    Exit,
}

/// Error type for command parsing
#[derive(Debug, Clone)]
pub struct CommandParseError {
    pub message: String,
}

impl CommandParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandParseError {}

/// Segment names meaning "no restriction".
const ALL_SEGMENTS: [&str; 3] = ["todos", "all", "*"];

/// Parse a command string into a Command enum
///
/// Leading slashes are accepted (`/preset tijolo-anc`).
pub fn parse_command(input: &str) -> Result<Command, CommandParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CommandParseError::new("Empty command. Type `help` for commands."));
    }

    let input = input.strip_prefix('/').unwrap_or(input);
    let mut parts = input.split_whitespace();
    let keyword = parts.next().unwrap_or("").to_lowercase();
    let rest: Vec<&str> = parts.collect();

    match keyword.as_str() {
        "show" | "ls" => Ok(Command::Show),
        "segment" | "seg" => {
            if rest.is_empty() {
                return Err(CommandParseError::new("Usage: segment <name|todos>"));
            }
            Ok(Command::Segment {
                name: parse_segment_name(&rest.join(" ")),
            })
        }
        "set" => {
            if rest.len() < 3 {
                return Err(CommandParseError::new("Usage: set <field> <min|max> <value>"));
            }
            let (column, side) = parse_field_side(rest[0], rest[1])?;
            Ok(Command::Set {
                column,
                side,
                value: rest[2..].join(" "),
            })
        }
        "unset" => {
            if rest.len() != 2 {
                return Err(CommandParseError::new("Usage: unset <field> <min|max>"));
            }
            let (column, side) = parse_field_side(rest[0], rest[1])?;
            Ok(Command::Unset { column, side })
        }
        "preset" => {
            let name = rest
                .first()
                .ok_or_else(|| CommandParseError::new("Usage: preset <name>"))?;
            let preset = name.parse::<Preset>().map_err(CommandParseError::new)?;
            Ok(Command::Preset { preset })
        }
        "clear" => Ok(Command::Clear),
        "tickers" => Ok(Command::Tickers),
        "segments" => Ok(Command::Segments),
        "state" => Ok(Command::State),
        "help" | "?" => Ok(Command::Help),
        "exit" | "quit" => Ok(Command::Exit),
        other => Err(CommandParseError::new(format!(
            "Unknown command '{}'. Type `help` for commands.",
            other
        ))),
    }
}

/// `None` for the "all segments" aliases.
pub fn parse_segment_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() || ALL_SEGMENTS.contains(&name.to_lowercase().as_str()) {
        None
    } else {
        Some(name.to_string())
    }
}

/// Resolve a filterable field key and bound side.
pub fn parse_field_side(field: &str, side: &str) -> Result<(Column, BoundSide), CommandParseError> {
    let column = field.parse::<Column>().map_err(CommandParseError::new)?;
    if !column.is_numeric() {
        return Err(CommandParseError::new(format!(
            "Column '{}' is not numeric",
            column.key()
        )));
    }
    let side = side.parse::<BoundSide>().map_err(CommandParseError::new)?;
    Ok((column, side))
}
