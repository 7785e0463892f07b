//! Cairo rendering for overlay primitives and raster ops.

use super::color::Color;
use super::font::FontDescriptor;
use super::ops::RasterOp;
use super::primitive::{ArrowCap, Primitive, StrokeStyle};
use super::shape::{MITER_LIMIT, Shape};
use crate::util;

/// Renders a single overlay primitive to a Cairo context.
///
/// Dispatches on the primitive variant. Overlay rendering is antialiased and
/// honours each primitive's alpha and stipple coverage.
pub fn render_primitive(ctx: &cairo::Context, primitive: &Primitive) {
    match primitive {
        Primitive::Line {
            from,
            to,
            style,
            arrow,
        } => render_line(ctx, *from, *to, style, arrow.as_ref()),
        Primitive::Rect {
            corner_a,
            corner_b,
            outline,
            fill,
        } => {
            let (x0, y0, x1, y1) =
                util::normalize_coords(corner_a.0, corner_a.1, corner_b.0, corner_b.1);
            ctx.new_path();
            ctx.rectangle(x0, y0, x1 - x0, y1 - y0);
            fill_and_stroke(ctx, outline, *fill);
        }
        Primitive::Oval {
            corner_a,
            corner_b,
            outline,
            fill,
        } => {
            let (cx, cy, rx, ry) =
                util::ellipse_bounds(corner_a.0, corner_a.1, corner_b.0, corner_b.1);
            if rx <= 0.0 || ry <= 0.0 {
                return;
            }
            ellipse_path(ctx, cx, cy, rx, ry);
            fill_and_stroke(ctx, outline, *fill);
        }
        Primitive::Polygon {
            points,
            outline,
            fill,
        } => {
            if points.is_empty() {
                return;
            }
            polygon_path(ctx, points);
            fill_and_stroke(ctx, outline, *fill);
        }
        Primitive::Text {
            x,
            y,
            text,
            color,
            alpha,
            size,
            font,
        } => {
            ctx.save().ok();
            ctx.set_antialias(cairo::Antialias::Gray);
            set_source(ctx, *color, *alpha);
            show_text(ctx, *x, *y, text, *size, font);
            ctx.restore().ok();
        }
        Primitive::Image { surface } => {
            ctx.save().ok();
            if ctx.set_source_surface(surface, 0.0, 0.0).is_ok() {
                let _ = ctx.paint();
            }
            ctx.restore().ok();
        }
    }
}

fn set_source(ctx: &cairo::Context, color: Color, alpha: f64) {
    let (r, g, b) = color.to_cairo();
    ctx.set_source_rgba(r, g, b, alpha);
}

fn apply_stroke_style(ctx: &cairo::Context, style: &StrokeStyle) {
    set_source(ctx, style.color, style.effective_alpha());
    ctx.set_line_width(style.width);
    if style.round_caps {
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.set_line_join(cairo::LineJoin::Round);
    } else {
        ctx.set_line_cap(cairo::LineCap::Butt);
        ctx.set_line_join(cairo::LineJoin::Miter);
        ctx.set_miter_limit(MITER_LIMIT);
    }
    match style.dash {
        Some((on, off)) => ctx.set_dash(&[on, off], 0.0),
        None => ctx.set_dash(&[], 0.0),
    }
}

/// Fills the current path (when requested) and strokes it with `outline`.
fn fill_and_stroke(ctx: &cairo::Context, outline: &StrokeStyle, fill: Option<Color>) {
    ctx.save().ok();
    if let Some(fill) = fill {
        set_source(ctx, fill, outline.alpha);
        let _ = ctx.fill_preserve();
    }
    apply_stroke_style(ctx, outline);
    let _ = ctx.stroke();
    ctx.restore().ok();
}

fn ellipse_path(ctx: &cairo::Context, cx: f64, cy: f64, rx: f64, ry: f64) {
    ctx.new_path();
    ctx.save().ok();
    ctx.translate(cx, cy);
    ctx.scale(rx, ry);
    ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
    ctx.restore().ok();
}

fn polygon_path(ctx: &cairo::Context, points: &[(f64, f64)]) {
    ctx.new_path();
    let mut iter = points.iter();
    if let Some(&(x, y)) = iter.next() {
        ctx.move_to(x, y);
    }
    for &(x, y) in iter {
        ctx.line_to(x, y);
    }
    ctx.close_path();
}

/// Render a straight line, optionally capped with an arrowhead at `to`
fn render_line(
    ctx: &cairo::Context,
    from: (f64, f64),
    to: (f64, f64),
    style: &StrokeStyle,
    arrow: Option<&ArrowCap>,
) {
    ctx.save().ok();
    apply_stroke_style(ctx, style);

    let head = arrow.and_then(|cap| arrow_cap_points(from, to, style.width, cap));
    let end = head.as_ref().map_or(to, |points| points[2]);

    ctx.move_to(from.0, from.1);
    ctx.line_to(end.0, end.1);
    let _ = ctx.stroke();

    if let Some(points) = head {
        ctx.set_dash(&[], 0.0);
        polygon_path(ctx, &points);
        let _ = ctx.fill();
    }
    ctx.restore().ok();
}

/// Arrowhead outline `[tip, left trail, neck, right trail]`; `None` for zero-length lines.
fn arrow_cap_points(
    from: (f64, f64),
    to: (f64, f64),
    width: f64,
    cap: &ArrowCap,
) -> Option<[(f64, f64); 4]> {
    let length = util::distance(from.0, from.1, to.0, to.1);
    if length <= f64::EPSILON {
        return None;
    }
    let (ux, uy) = ((to.0 - from.0) / length, (to.1 - from.1) / length);
    let (px, py) = (-uy, ux);
    let half = width / 2.0 + cap.flare;
    let neck = (to.0 - ux * cap.neck, to.1 - uy * cap.neck);
    let base = (to.0 - ux * cap.trail, to.1 - uy * cap.trail);
    Some([
        to,
        (base.0 + px * half, base.1 + py * half),
        neck,
        (base.0 - px * half, base.1 - py * half),
    ])
}

/// Lays out `text` with the given font and draws it with its top-left corner at `(x, y)`.
///
/// The caller sets the source colour.
pub fn show_text(
    ctx: &cairo::Context,
    x: f64,
    y: f64,
    text: &str,
    size: f64,
    font: &FontDescriptor,
) {
    let layout = pangocairo::functions::create_layout(ctx);
    let font_desc = pango::FontDescription::from_string(&font.to_pango_string(size));
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    ctx.move_to(x, y);
    pangocairo::functions::show_layout(ctx, &layout);
    ctx.new_path();
}

// ============================================================================
// Raster ops
// ============================================================================

/// Replays a batch of display-space raster ops onto a raster context.
///
/// `scale` maps display coordinates to raster pixels. With `opacity < 1` the
/// batch is composited as one group so overlapping segments do not stack.
pub fn render_raster_ops(
    ctx: &cairo::Context,
    ops: &[RasterOp],
    scale: (f64, f64),
    opacity: f64,
) -> Result<(), cairo::Error> {
    if ops.is_empty() {
        return Ok(());
    }
    let opacity = opacity.clamp(0.0, 1.0);
    let grouped = opacity < 1.0;

    ctx.save()?;
    ctx.scale(scale.0, scale.1);
    if grouped {
        ctx.push_group();
    }
    for op in ops {
        render_raster_op(ctx, op);
    }
    let result = if grouped {
        ctx.pop_group_to_source()
            .and_then(|_| ctx.paint_with_alpha(opacity))
    } else {
        Ok(())
    };
    ctx.restore()?;
    ctx.target().flush();
    result
}

/// Renders one raster op with opaque, pixel-exact semantics.
pub fn render_raster_op(ctx: &cairo::Context, op: &RasterOp) {
    ctx.save().ok();
    match op {
        RasterOp::Line {
            from,
            to,
            color,
            width,
            round,
            dash,
        } => {
            let mut style = StrokeStyle::new(*color, *width);
            style.round_caps = *round;
            style.dash = *dash;
            apply_stroke_style(ctx, &style);
            ctx.move_to(from.0, from.1);
            ctx.line_to(to.0, to.1);
            let _ = ctx.stroke();
        }
        RasterOp::Dot { x, y, color } => {
            set_source(ctx, *color, 1.0);
            ctx.rectangle(x.floor(), y.floor(), 1.0, 1.0);
            let _ = ctx.fill();
        }
        RasterOp::Shape {
            shape,
            outline,
            width,
            fill,
        } => render_raster_shape(ctx, shape, *outline, *width, *fill),
        RasterOp::Text {
            x,
            y,
            text,
            color,
            size,
            font,
        } => {
            set_source(ctx, *color, 1.0);
            show_text(ctx, *x, *y, text, *size, font);
        }
    }
    ctx.restore().ok();
}

fn render_raster_shape(
    ctx: &cairo::Context,
    shape: &Shape,
    outline: Color,
    width: f64,
    fill: Option<Color>,
) {
    match shape {
        Shape::Line {
            x1,
            y1,
            x2,
            y2,
            dashed,
        } => {
            let mut style = StrokeStyle::new(outline, width).with_butt_caps();
            if *dashed {
                style = style.with_dash(8.0, 6.0);
            }
            apply_stroke_style(ctx, &style);
            ctx.move_to(*x1, *y1);
            ctx.line_to(*x2, *y2);
            let _ = ctx.stroke();
        }
        Shape::Arrow { x1, y1, x2, y2 } => {
            apply_stroke_style(ctx, &StrokeStyle::new(outline, width).with_butt_caps());
            ctx.move_to(*x1, *y1);
            ctx.line_to(*x2, *y2);
            let _ = ctx.stroke();

            let [left, right] = util::arrowhead_points(
                *x1,
                *y1,
                *x2,
                *y2,
                util::ARROW_HEAD_LENGTH,
                util::ARROW_HEAD_SPREAD,
            );
            polygon_path(ctx, &[(*x2, *y2), left, right]);
            let _ = ctx.fill();
        }
        Shape::Rect { x0, y0, x1, y1 } => {
            render_inclusive_box(ctx, (*x0, *y0, *x1, *y1), outline, width, fill, |ctx, x, y, w, h| {
                ctx.rectangle(x, y, w, h)
            });
        }
        Shape::Ellipse { x0, y0, x1, y1 } => {
            render_inclusive_box(ctx, (*x0, *y0, *x1, *y1), outline, width, fill, |ctx, x, y, w, h| {
                ellipse_path_continue(ctx, x + w / 2.0, y + h / 2.0, w / 2.0, h / 2.0)
            });
        }
        Shape::Polygon { points } => {
            if points.is_empty() {
                return;
            }
            polygon_path(ctx, points);
            if let Some(fill) = fill {
                set_source(ctx, fill, 1.0);
                let _ = ctx.fill_preserve();
            }
            apply_stroke_style(ctx, &StrokeStyle::new(outline, width).with_butt_caps());
            let _ = ctx.stroke();
        }
    }
}

/// Adds an ellipse sub-path without clearing the current path.
fn ellipse_path_continue(ctx: &cairo::Context, cx: f64, cy: f64, rx: f64, ry: f64) {
    ctx.save().ok();
    ctx.translate(cx, cy);
    ctx.scale(rx, ry);
    ctx.new_sub_path();
    ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
    ctx.restore().ok();
}

/// Draws a box shape covering pixels `x0..=x1`, `y0..=y1` with an inward outline.
///
/// The outline is the even-odd difference between the outer shape and the shape
/// inset by `width`; boxes too small for a hollow outline are filled solid.
fn render_inclusive_box(
    ctx: &cairo::Context,
    (x0, y0, x1, y1): (f64, f64, f64, f64),
    outline: Color,
    width: f64,
    fill: Option<Color>,
    path: impl Fn(&cairo::Context, f64, f64, f64, f64),
) {
    let (x, y) = (x0.floor(), y0.floor());
    let (w, h) = (x1.floor() - x + 1.0, y1.floor() - y + 1.0);
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let inset = width.round().max(1.0);

    if let Some(fill) = fill {
        ctx.new_path();
        path(ctx, x, y, w, h);
        set_source(ctx, fill, 1.0);
        let _ = ctx.fill();
    }

    ctx.new_path();
    path(ctx, x, y, w, h);
    if w > inset * 2.0 && h > inset * 2.0 {
        path(ctx, x + inset, y + inset, w - inset * 2.0, h - inset * 2.0);
        ctx.set_fill_rule(cairo::FillRule::EvenOdd);
    }
    set_source(ctx, outline, 1.0);
    let _ = ctx.fill();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, BLUE, RED};
    use crate::draw::raster::{RasterImage, RasterPen};

    fn replay(raster: &RasterImage, ops: &[RasterOp]) {
        let pen = RasterPen::bind(raster).unwrap();
        render_raster_ops(pen.context(), ops, (1.0, 1.0), 1.0).unwrap();
    }

    #[test]
    fn inclusive_rectangle_outline_spans_both_corners() {
        let raster = RasterImage::new(100, 100, BLACK).unwrap();
        replay(
            &raster,
            &[RasterOp::Shape {
                shape: Shape::Rect {
                    x0: 20.0,
                    y0: 20.0,
                    x1: 80.0,
                    y1: 80.0,
                },
                outline: RED,
                width: 2.0,
                fill: None,
            }],
        );

        assert_eq!(raster.pixel(20, 20), Some(RED));
        assert_eq!(raster.pixel(80, 80), Some(RED));
        assert_eq!(raster.pixel(81, 80), Some(BLACK));
        assert_eq!(raster.pixel(19, 50), Some(BLACK));
        // hollow interior
        assert_eq!(raster.pixel(50, 50), Some(BLACK));
        assert_eq!(raster.pixel(21, 50), Some(RED));
        assert_eq!(raster.pixel(22, 50), Some(BLACK));
    }

    #[test]
    fn filled_ellipse_covers_center() {
        let raster = RasterImage::new(60, 60, BLACK).unwrap();
        replay(
            &raster,
            &[RasterOp::Shape {
                shape: Shape::Ellipse {
                    x0: 10.0,
                    y0: 10.0,
                    x1: 50.0,
                    y1: 50.0,
                },
                outline: RED,
                width: 2.0,
                fill: Some(BLUE),
            }],
        );
        assert_eq!(raster.pixel(30, 30), Some(BLUE));
        assert_eq!(raster.pixel(30, 10), Some(RED));
        assert_eq!(raster.pixel(11, 11), Some(BLACK));
    }

    #[test]
    fn arrow_head_is_filled_at_end_point() {
        let raster = RasterImage::new(120, 40, BLACK).unwrap();
        replay(
            &raster,
            &[RasterOp::Shape {
                shape: Shape::Arrow {
                    x1: 10.0,
                    y1: 20.0,
                    x2: 100.0,
                    y2: 20.0,
                },
                outline: RED,
                width: 1.0,
                fill: None,
            }],
        );
        // inside the head, off the shaft
        assert_eq!(raster.pixel(90, 23), Some(RED));
        assert_eq!(raster.pixel(50, 25), Some(BLACK));
    }

    #[test]
    fn dots_paint_single_pixels() {
        let raster = RasterImage::new(10, 10, BLACK).unwrap();
        replay(
            &raster,
            &[RasterOp::Dot {
                x: 4.0,
                y: 5.0,
                color: RED,
            }],
        );
        assert_eq!(raster.pixel(4, 5), Some(RED));
        assert_eq!(raster.pixel(5, 5), Some(BLACK));
        assert_eq!(raster.pixel(4, 4), Some(BLACK));
    }

    #[test]
    fn half_opacity_batch_blends_once() {
        let raster = RasterImage::new(20, 20, BLACK).unwrap();
        let line = |x| RasterOp::Line {
            from: (x, 10.0),
            to: (x + 8.0, 10.0),
            color: Color::new(200, 200, 200),
            width: 4.0,
            round: true,
            dash: None,
        };
        let pen = RasterPen::bind(&raster).unwrap();
        render_raster_ops(pen.context(), &[line(4.0), line(6.0)], (1.0, 1.0), 0.5).unwrap();

        // overlap region is not darker/brighter than a single pass
        let single = raster.pixel(5, 10).unwrap();
        let overlap = raster.pixel(9, 10).unwrap();
        assert_eq!(single, overlap);
        assert!(single.r > 90 && single.r < 110);
    }

    #[test]
    fn arrow_cap_shortens_line_to_neck() {
        let points =
            arrow_cap_points((0.0, 0.0), (100.0, 0.0), 2.0, &ArrowCap::default()).unwrap();
        assert_eq!(points[0], (100.0, 0.0));
        assert_eq!(points[2], (84.0, 0.0));
        assert!((points[1].1 - 7.0).abs() < 1e-9);
        assert!(arrow_cap_points((5.0, 5.0), (5.0, 5.0), 2.0, &ArrowCap::default()).is_none());
    }

    #[test]
    fn overlay_primitives_render_without_panicking() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 50, 50).unwrap();
        let ctx = cairo::Context::new(&surface).unwrap();
        let style = StrokeStyle::new(RED, 3.0).with_dash(8.0, 6.0);
        for primitive in [
            Primitive::Line {
                from: (0.0, 0.0),
                to: (40.0, 40.0),
                style: style.clone(),
                arrow: Some(ArrowCap::default()),
            },
            Primitive::Rect {
                corner_a: (40.0, 40.0),
                corner_b: (5.0, 5.0),
                outline: style.clone(),
                fill: Some(BLUE),
            },
            Primitive::Oval {
                corner_a: (5.0, 5.0),
                corner_b: (5.0, 30.0),
                outline: style.clone(),
                fill: None,
            },
            Primitive::Polygon {
                points: vec![],
                outline: style,
                fill: None,
            },
        ] {
            render_primitive(&ctx, &primitive);
        }
    }
}
