mod actions;
mod core;
mod fill;
mod mouse;
mod render;
mod shapes;
mod strokes;
mod text;
#[cfg(test)]
mod tests;

pub use core::{
    ActiveStroke, BoardSettings, DrawingState, InputState, MAX_STROKE_WIDTH, RECENT_COLORS,
};
