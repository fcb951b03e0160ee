//! Pointer input.
//!
//! Device events arrive as presses, releases and motion; [`PointerInput`]
//! folds them into the `(x, y, button_down)` observations the stroke tracker
//! consumes. Scripts let the same events come from text, one per line.

pub mod events;
pub mod pointer;
pub mod script;

pub use events::{MouseButton, PointerEvent};
pub use pointer::PointerInput;
pub use script::{ScriptCommand, ScriptError, commands, parse_line};
