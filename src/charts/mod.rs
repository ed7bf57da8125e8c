//! Charts module - Colour scales and static chart rendering

mod plotter;
mod renderer;

pub use renderer::{ChartRenderer, RenderError};
