//! Session metadata export.
//!
//! Captures a lightweight snapshot of the board's UI state (page count, pen,
//! tool) as JSON. Drawing content is never part of it; pages are exported as
//! images instead.

mod metadata;

pub use metadata::{SessionMetadata, load_metadata, save_metadata};
