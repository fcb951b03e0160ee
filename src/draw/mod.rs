//! Rendering boundary and the headless raster surface.
//!
//! The engine talks to a display only through [`Renderer`]. This module also
//! provides [`Canvas`], an in-memory grayscale surface, [`HeadlessDisplay`],
//! which puts a canvas behind the renderer interface, and [`Frame`], which
//! simply records draw calls.

pub mod canvas;
pub mod display;
pub mod frame;
pub mod overlay;
pub mod renderer;

pub use canvas::{Anchor, Canvas, CanvasError, StrokeStyle};
pub use display::{DisplaySignals, HeadlessDisplay};
pub use frame::{Frame, Segment};
pub use overlay::{load_overlay, rotate};
pub use renderer::{PresentOutcome, Renderer};
