//! Input handling and tool state machine.
//!
//! This module translates pointer events and UI requests into drawing actions.
//! It maintains the current tool state and drawing parameters, routes drags to
//! the tool-specific stroke generators and owns the page set, renderer and
//! history they act on.

pub mod events;
pub mod state;
pub mod tool;

// Re-export commonly used types at module level
pub use events::MouseButton;
pub use state::{ActiveStroke, BoardSettings, DrawingState, InputState, MAX_STROKE_WIDTH};
pub use tool::{ParseToolError, ToolKind, ToolState};
