//! Freehand-family stroke generators and the laser pointer.
//!
//! Every generator draws its overlay primitives right away and queues the
//! matching raster writes on the stroke for replay at pointer-up.

use crate::draw::color::LASER_GLOWS;
use crate::draw::{Layer, Primitive, RED, RasterOp, Stipple, StrokeStyle};
use crate::util;

use super::{ActiveStroke, InputState};

/// Offsets of the parallel brush segments (both axes).
const BRUSH_OFFSETS: std::ops::RangeInclusive<i32> = -2..=2;

impl InputState {
    /// Pen and eraser: interpolated round segments on both buffers.
    pub(super) fn draw_freehand(&mut self, stroke: &mut ActiveStroke, to: (f64, f64)) {
        let from = stroke.last;
        let size = stroke.size as f64;
        let steps = util::interpolation_steps(util::distance(from.0, from.1, to.0, to.1), size);
        let style = StrokeStyle::new(stroke.color, size);

        for (a, b) in util::interpolate_segments(from, to, steps) {
            self.add_drawing(
                stroke,
                Primitive::Line {
                    from: a,
                    to: b,
                    style: style.clone(),
                    arrow: None,
                },
            );
            stroke.push_op(RasterOp::Line {
                from: a,
                to: b,
                color: stroke.color,
                width: size,
                round: true,
                dash: None,
            });
        }
    }

    /// Brush: five thin stippled offset segments on screen, one full-width raster line.
    pub(super) fn draw_brush(&mut self, stroke: &mut ActiveStroke, to: (f64, f64)) {
        let from = stroke.last;
        let style = StrokeStyle::new(stroke.color, (stroke.size / 2).max(1) as f64)
            .with_stipple(Stipple::Gray50);

        for offset in BRUSH_OFFSETS {
            let off = offset as f64;
            self.add_drawing(
                stroke,
                Primitive::Line {
                    from: (from.0 + off, from.1 + off),
                    to: (to.0 + off, to.1 + off),
                    style: style.clone(),
                    arrow: None,
                },
            );
        }
        stroke.push_op(RasterOp::Line {
            from,
            to,
            color: stroke.color,
            width: stroke.size as f64,
            round: false,
            dash: None,
        });
    }

    /// Calligraphy: width shrinks as the pointer speeds up.
    pub(super) fn draw_calligraphy(&mut self, stroke: &mut ActiveStroke, to: (f64, f64)) {
        let from = stroke.last;
        let speed = util::distance(from.0, from.1, to.0, to.1);
        let width = util::calligraphy_width(stroke.size as f64, speed);

        self.add_drawing(
            stroke,
            Primitive::Line {
                from,
                to,
                style: StrokeStyle::new(stroke.color, width),
                arrow: None,
            },
        );
        stroke.push_op(RasterOp::Line {
            from,
            to,
            color: stroke.color,
            width,
            round: false,
            dash: None,
        });
    }

    /// Highlighter: triple width, quarter-coverage on screen, opaque on the raster.
    pub(super) fn draw_highlighter(&mut self, stroke: &mut ActiveStroke, to: (f64, f64)) {
        let from = stroke.last;
        let width = (stroke.size * 3) as f64;

        self.add_drawing(
            stroke,
            Primitive::Line {
                from,
                to,
                style: StrokeStyle::new(stroke.color, width).with_stipple(Stipple::Gray25),
                arrow: None,
            },
        );
        stroke.push_op(RasterOp::Line {
            from,
            to,
            color: stroke.color,
            width,
            round: false,
            dash: None,
        });
    }

    /// Spray: `size * 3` dots scattered in a disc of radius `size * 2` around the pointer.
    pub(super) fn draw_spray(&mut self, stroke: &mut ActiveStroke, to: (f64, f64)) {
        let radius = (stroke.size * 2) as i32;
        let count = (stroke.size * 3) as usize;
        let offsets = util::spray_offsets(&mut self.rng, radius, count);
        let outline = StrokeStyle::new(stroke.color, 1.0);

        for (ox, oy) in offsets {
            let (px, py) = ((to.0 + ox as f64).floor(), (to.1 + oy as f64).floor());
            self.add_drawing(
                stroke,
                Primitive::Oval {
                    corner_a: (px, py),
                    corner_b: (px + 1.0, py + 1.0),
                    outline: outline.clone(),
                    fill: Some(stroke.color),
                },
            );
            stroke.push_op(RasterOp::Dot {
                x: px,
                y: py,
                color: stroke.color,
            });
        }
    }

    /// Laser: glow rings plus a red trail segment, overlay only.
    ///
    /// The trail keeps at most `laser_capacity` items; older ones are dropped.
    pub(super) fn draw_laser(&mut self, stroke: &ActiveStroke, to: (f64, f64)) {
        let size = stroke.size as f64;
        let overlay = self.renderer.overlay_mut();

        for (i, glow) in LASER_GLOWS.iter().enumerate() {
            let r = size + 2.0 * i as f64;
            let handle = overlay.insert(
                Layer::Laser,
                Primitive::Oval {
                    corner_a: (to.0 - r, to.1 - r),
                    corner_b: (to.0 + r, to.1 + r),
                    outline: StrokeStyle::new(*glow, 1.0),
                    fill: None,
                },
            );
            self.laser_trail.push_back(handle);
        }

        let handle = overlay.insert(
            Layer::Laser,
            Primitive::Line {
                from: stroke.last,
                to,
                style: StrokeStyle::new(RED, 2.0),
                arrow: None,
            },
        );
        self.laser_trail.push_back(handle);

        while self.laser_trail.len() > self.laser_capacity {
            if let Some(oldest) = self.laser_trail.pop_front() {
                overlay.remove(oldest);
            }
        }
    }

    /// Removes the whole laser trail from the overlay.
    pub(super) fn clear_laser(&mut self) {
        let overlay = self.renderer.overlay_mut();
        for handle in self.laser_trail.drain(..) {
            overlay.remove(handle);
        }
    }
}
