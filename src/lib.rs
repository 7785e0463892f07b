//! Library exports for reusing slateboard subsystems.
//!
//! Exposes the board state machine together with the drawing, history and
//! export modules it is built from, so front ends and tools (such as the
//! headless CLI and the schema dumper) share one implementation.

pub mod config;
pub mod dialogs;
pub mod draw;
pub mod export;
pub mod history;
pub mod input;
pub mod renderer;
pub mod script;
pub mod session;
pub mod util;

pub use config::Config;
pub use input::{BoardSettings, InputState};
