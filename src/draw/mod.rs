//! Drawing primitives, raster buffers and pages (Cairo-based).
//!
//! This module defines the two representations of a drawing:
//! - [`Overlay`]: display-only vector [`Primitive`]s addressed by [`OverlayHandle`]s
//! - [`RasterImage`]: the per-page pixel backing store, written through a [`RasterPen`]
//!
//! plus the shape geometry, deferred raster ops, flood fill and page types
//! that tie them together.

pub mod color;
pub mod dirty;
pub mod fill;
pub mod font;
pub mod ops;
pub mod overlay;
pub mod page;
pub mod page_set;
pub mod primitive;
pub mod raster;
pub mod render;
pub mod shape;

// Re-export commonly used types at module level
pub use color::Color;
pub use dirty::DirtyTracker;
pub use fill::{FillError, flood_fill};
pub use font::FontDescriptor;
pub use ops::RasterOp;
pub use overlay::{Layer, Overlay, OverlayHandle, StrokeGroup};
pub use page::Page;
pub use page_set::PageSet;
pub use primitive::{ArrowCap, Primitive, Stipple, StrokeStyle};
pub use raster::{RasterError, RasterImage, RasterPatch, RasterPen};
pub use render::{render_primitive, render_raster_ops};
pub use shape::Shape;

pub use color::{BLACK, BLUE, GRAY, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
