//! Normalized shape geometry committed to the raster buffer.

use super::font::FontDescriptor;
use crate::input::ToolKind;
use crate::util::{self, Rect};

/// Raster-side geometry of a committed shape.
///
/// Box-based shapes always hold normalized corners (`x0 <= x1`, `y0 <= y1`);
/// a box covers pixel columns `x0..=x1` and rows `y0..=y1`.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Straight line, optionally dashed (8 on, 6 off)
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        dashed: bool,
    },
    /// Line with a filled arrowhead at (x2, y2)
    Arrow { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Axis-aligned rectangle
    Rect { x0: f64, y0: f64, x1: f64, y1: f64 },
    /// Ellipse inscribed in the box
    Ellipse { x0: f64, y0: f64, x1: f64, y1: f64 },
    /// Closed polygon (triangle, diamond, star)
    Polygon { points: Vec<(f64, f64)> },
}

impl Shape {
    /// Builds the committed geometry for a shape tool dragged from `start` to `end`.
    ///
    /// Returns `None` for tools that do not produce shapes.
    pub fn from_drag(
        tool: ToolKind,
        start: (f64, f64),
        end: (f64, f64),
        star_points: usize,
    ) -> Option<Self> {
        let (sx, sy) = start;
        let (ex, ey) = end;
        let (x0, y0, x1, y1) = util::normalize_coords(sx, sy, ex, ey);

        let shape = match tool {
            ToolKind::Line | ToolKind::Dotted => Shape::Line {
                x1: sx,
                y1: sy,
                x2: ex,
                y2: ey,
                dashed: tool == ToolKind::Dotted,
            },
            ToolKind::Arrow => Shape::Arrow {
                x1: sx,
                y1: sy,
                x2: ex,
                y2: ey,
            },
            ToolKind::Rectangle => Shape::Rect { x0, y0, x1, y1 },
            ToolKind::Ellipse => Shape::Ellipse { x0, y0, x1, y1 },
            ToolKind::Circle => {
                let (cx0, cy0, cx1, cy1) = util::circle_bounds(sx, sy, ex, ey);
                let (x0, y0, x1, y1) = util::normalize_coords(cx0, cy0, cx1, cy1);
                Shape::Ellipse { x0, y0, x1, y1 }
            }
            ToolKind::Triangle => Shape::Polygon {
                points: util::triangle_points(x0, y0, x1, y1),
            },
            ToolKind::Diamond => Shape::Polygon {
                points: util::diamond_points(x0, y0, x1, y1),
            },
            ToolKind::Star => Shape::Polygon {
                points: util::star_points(x0, y0, x1, y1, star_points),
            },
            _ => return None,
        };
        Some(shape)
    }

    /// Returns the axis-aligned bounding box for this shape, expanded to cover stroke width.
    pub fn bounding_box(&self, thick: f64) -> Option<Rect> {
        match self {
            Shape::Line { x1, y1, x2, y2, .. } => bounding_box_for_line(*x1, *y1, *x2, *y2, thick),
            Shape::Arrow { x1, y1, x2, y2 } => bounding_box_for_arrow(*x1, *y1, *x2, *y2, thick),
            Shape::Rect { x0, y0, x1, y1 } | Shape::Ellipse { x0, y0, x1, y1 } => {
                bounding_box_for_box(*x0, *y0, *x1, *y1)
            }
            Shape::Polygon { points } => bounding_box_for_polygon(points, thick),
        }
    }
}

/// Cairo miter limit used for polygon outlines.
pub(crate) const MITER_LIMIT: f64 = 10.0;

fn stroke_padding(thick: f64) -> f64 {
    (thick / 2.0).ceil().max(1.0)
}

/// Polygon outlines use mitered joins; a miter reaches at most
/// `MITER_LIMIT * thick / 2` past its vertex before cairo bevels it.
pub(crate) fn bounding_box_for_polygon(points: &[(f64, f64)], thick: f64) -> Option<Rect> {
    let miter = (thick / 2.0 * MITER_LIMIT).ceil() - stroke_padding(thick);
    bounding_box_for_points(points, thick).map(|rect| rect.inflate(miter.max(0.0) as i32))
}

pub(crate) fn bounding_box_for_points(points: &[(f64, f64)], thick: f64) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let (mut min_x, mut min_y) = *first;
    let (mut max_x, mut max_y) = *first;

    for &(x, y) in rest {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let padding = stroke_padding(thick);
    Rect::covering(
        min_x - padding,
        min_y - padding,
        max_x + padding,
        max_y + padding,
    )
}

pub(crate) fn bounding_box_for_line(x1: f64, y1: f64, x2: f64, y2: f64, thick: f64) -> Option<Rect> {
    bounding_box_for_points(&[(x1, y1), (x2, y2)], thick)
}

/// Inclusive pixel box: outlines grow inward, so no stroke padding is needed.
pub(crate) fn bounding_box_for_box(x0: f64, y0: f64, x1: f64, y1: f64) -> Option<Rect> {
    Rect::covering(x0, y0, x1 + 1.0, y1 + 1.0)
}

pub(crate) fn bounding_box_for_arrow(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    thick: f64,
) -> Option<Rect> {
    let [left, right] = util::arrowhead_points(
        x1,
        y1,
        x2,
        y2,
        util::ARROW_HEAD_LENGTH,
        util::ARROW_HEAD_SPREAD,
    );
    bounding_box_for_points(&[(x1, y1), (x2, y2), left, right], thick)
}

pub(crate) fn bounding_box_for_text(
    x: f64,
    y: f64,
    text: &str,
    size: f64,
    font_descriptor: &FontDescriptor,
) -> Option<Rect> {
    if text.is_empty() {
        return None;
    }

    // Use a tiny image surface for measurement; the layout is all we need.
    let surface = cairo::ImageSurface::create(cairo::Format::Rgb24, 1, 1).ok()?;
    let ctx = cairo::Context::new(&surface).ok()?;

    let layout = pangocairo::functions::create_layout(&ctx);
    let font_desc = pango::FontDescription::from_string(&font_descriptor.to_pango_string(size));
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    let (ink_rect, logical_rect) = layout.extents();
    let scale = pango::SCALE as f64;

    // Text is anchored at its top-left corner; cover both ink and logical extents.
    let min_x = (ink_rect.x().min(logical_rect.x())) as f64 / scale;
    let min_y = (ink_rect.y().min(logical_rect.y())) as f64 / scale;
    let max_x = ((ink_rect.x() + ink_rect.width()).max(logical_rect.x() + logical_rect.width()))
        as f64
        / scale;
    let max_y = ((ink_rect.y() + ink_rect.height())
        .max(logical_rect.y() + logical_rect.height())) as f64
        / scale;

    Rect::covering(x + min_x - 1.0, y + min_y - 1.0, x + max_x + 1.0, y + max_y + 1.0)
}
