//! Deferred raster writes.
//!
//! Stroke generators queue [`RasterOp`]s in display coordinates while the
//! pointer moves; the whole batch is replayed onto the page raster once the
//! stroke ends.

use super::color::Color;
use super::font::FontDescriptor;
use super::shape::{self, Shape};
use crate::util::Rect;

/// Single queued write against a raster buffer.
#[derive(Clone, Debug, PartialEq)]
pub enum RasterOp {
    /// Stroked segment
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        width: f64,
        /// Round caps and joins (freehand family) instead of butt caps
        round: bool,
        dash: Option<(f64, f64)>,
    },
    /// One opaque pixel
    Dot { x: f64, y: f64, color: Color },
    /// Committed shape geometry
    Shape {
        shape: Shape,
        outline: Color,
        width: f64,
        fill: Option<Color>,
    },
    /// Text stamped with its top-left corner at `(x, y)`
    Text {
        x: f64,
        y: f64,
        text: String,
        color: Color,
        size: f64,
        font: FontDescriptor,
    },
}

impl RasterOp {
    /// Display-space area this op may touch.
    pub fn bounding_box(&self) -> Option<Rect> {
        match self {
            RasterOp::Line {
                from, to, width, ..
            } => shape::bounding_box_for_line(from.0, from.1, to.0, to.1, *width),
            RasterOp::Dot { x, y, .. } => Rect::covering(*x, *y, x + 1.0, y + 1.0),
            RasterOp::Shape { shape, width, .. } => shape.bounding_box(*width),
            RasterOp::Text {
                x,
                y,
                text,
                size,
                font,
                ..
            } => shape::bounding_box_for_text(*x, *y, text, *size, font),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{RED, WHITE};

    #[test]
    fn dot_covers_one_pixel() {
        let op = RasterOp::Dot {
            x: 12.0,
            y: 7.0,
            color: WHITE,
        };
        assert_eq!(op.bounding_box(), Rect::new(12, 7, 1, 1));
    }

    #[test]
    fn line_box_includes_width() {
        let op = RasterOp::Line {
            from: (10.0, 10.0),
            to: (50.0, 10.0),
            color: WHITE,
            width: 4.0,
            round: true,
            dash: None,
        };
        let rect = op.bounding_box().unwrap();
        assert!(rect.contains(10, 8) && rect.contains(51, 11));
    }

    #[test]
    fn shape_box_delegates_to_geometry() {
        let op = RasterOp::Shape {
            shape: Shape::Rect {
                x0: 20.0,
                y0: 20.0,
                x1: 80.0,
                y1: 80.0,
            },
            outline: RED,
            width: 2.0,
            fill: None,
        };
        assert_eq!(op.bounding_box(), Rect::new(20, 20, 61, 61));
    }
}
