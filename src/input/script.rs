//! Text pointer scripts, one command per line.
//!
//! ```text
//! # comments and blank lines are ignored
//! move 10 10
//! press 10 10          # left button unless a button name follows
//! move 40 25
//! wait 120             # milliseconds
//! release 40 25
//! press 0 0 right
//! cut                  # ends the current take
//! ```

use super::events::{MouseButton, PointerEvent};
use crate::board::Point;
use std::io::BufRead;
use std::time::Duration;
use thiserror::Error;

/// A parsed script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    Pointer(PointerEvent),
    Wait(Duration),
    /// End of the current take.
    Cut,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses one line. Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(raw: &str, line: usize) -> Result<Option<ScriptCommand>, ScriptError> {
    let syntax = |reason: String| ScriptError::Syntax { line, reason };

    let content = raw.split('#').next().unwrap_or_default().trim();
    let mut words = content.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let point = |args: &[&str]| -> Result<Point, ScriptError> {
        match args {
            [x, y, ..] => {
                let x = x
                    .parse()
                    .map_err(|_| syntax(format!("invalid x coordinate {:?}", x)))?;
                let y = y
                    .parse()
                    .map_err(|_| syntax(format!("invalid y coordinate {:?}", y)))?;
                Ok(Point::new(x, y))
            }
            _ => Err(syntax(format!("{} needs X and Y", verb))),
        }
    };
    let button = |args: &[&str]| -> Result<MouseButton, ScriptError> {
        match args.get(2).map(|b| b.to_ascii_lowercase()).as_deref() {
            None | Some("left") => Ok(MouseButton::Left),
            Some("right") => Ok(MouseButton::Right),
            Some("middle") => Ok(MouseButton::Middle),
            Some(other) => Err(syntax(format!("unknown button {:?}", other))),
        }
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "move" | "m" => ScriptCommand::Pointer(PointerEvent::Motion { at: point(&args)? }),
        "press" | "down" => ScriptCommand::Pointer(PointerEvent::Press {
            button: button(&args)?,
            at: point(&args)?,
        }),
        "release" | "up" => ScriptCommand::Pointer(PointerEvent::Release {
            button: button(&args)?,
            at: point(&args)?,
        }),
        "wait" | "w" => {
            let ms: u64 = args
                .first()
                .ok_or_else(|| syntax("wait needs a duration in milliseconds".into()))?
                .parse()
                .map_err(|_| syntax(format!("invalid duration {:?}", args[0])))?;
            ScriptCommand::Wait(Duration::from_millis(ms))
        }
        "cut" => ScriptCommand::Cut,
        other => return Err(syntax(format!("unknown command {:?}", other))),
    };
    Ok(Some(command))
}

/// Iterates over the commands of a script, numbering lines from 1.
pub fn commands<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<ScriptCommand, ScriptError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(text) => parse_line(&text, index + 1).transpose(),
            Err(err) => Some(Err(ScriptError::Io(err))),
        })
}
