//! Geometry utilities and colour name helpers.
//!
//! This module provides:
//! - Coordinate normalization for drag-direction-agnostic shapes
//! - Distance, angle and interpolation math used by the stroke generators
//! - Polygon point generation (star, diamond, triangle, arrowhead)
//! - Integer rectangles for raster patch bookkeeping

use crate::draw::{Color, color::*};
use rand::Rng;

/// Arrowhead length (in pixels) for raster-committed arrows.
pub const ARROW_HEAD_LENGTH: f64 = 16.0;

/// Half-angle (radians) between the arrow shaft and each arrowhead edge.
pub const ARROW_HEAD_SPREAD: f64 = 0.4;

/// Ratio between a star's inner and outer radius.
pub const STAR_INNER_RATIO: f64 = 0.4;

// ============================================================================
// Coordinates
// ============================================================================

/// Orders two corner points as `(min_x, min_y, max_x, max_y)`.
///
/// Raster primitives need top-left/bottom-right ordering; the overlay does not care.
pub fn normalize_coords(x0: f64, y0: f64, x1: f64, y1: f64) -> (f64, f64, f64, f64) {
    (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

/// Euclidean distance between two points.
pub fn distance(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    (x1 - x0).hypot(y1 - y0)
}

/// Angle (radians) of the vector from the first point to the second.
pub fn angle(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    (y1 - y0).atan2(x1 - x0)
}

/// Number of interpolation steps for a freehand segment.
///
/// `max(1, distance / max(1, width * 0.5))`, truncated.
pub fn interpolation_steps(distance: f64, width: f64) -> usize {
    let spacing = (width * 0.5).max(1.0);
    ((distance / spacing) as usize).max(1)
}

/// Splits the segment `from -> to` into `steps` consecutive sub-segments.
pub fn interpolate_segments(
    from: (f64, f64),
    to: (f64, f64),
    steps: usize,
) -> Vec<((f64, f64), (f64, f64))> {
    let steps = steps.max(1);
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let mut prev = from;
    let mut segments = Vec::with_capacity(steps);
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let next = (from.0 + dx * t, from.1 + dy * t);
        segments.push((prev, next));
        prev = next;
    }
    segments
}

/// Speed-sensitive calligraphy width: `max(1, base * 1.5 - speed * 0.3)`.
pub fn calligraphy_width(base: f64, speed: f64) -> f64 {
    (base * 1.5 - speed * 0.3).trunc().max(1.0)
}

// ============================================================================
// Polygon Geometry
// ============================================================================

/// Star vertices for a drag from `(sx, sy)` to `(ex, ey)`.
///
/// The star is centred on the drag midpoint. Outer radius is half the drag
/// diagonal, inner radius is 40% of it; vertex `i` sits at `π/2 + i·π/num`.
pub fn star_points(sx: f64, sy: f64, ex: f64, ey: f64, num: usize) -> Vec<(f64, f64)> {
    let num = num.max(2);
    let cx = (sx + ex) / 2.0;
    let cy = (sy + ey) / 2.0;
    let outer = distance(sx, sy, ex, ey) / 2.0;
    let inner = outer * STAR_INNER_RATIO;

    (0..num * 2)
        .map(|i| {
            let theta = std::f64::consts::FRAC_PI_2 + i as f64 * std::f64::consts::PI / num as f64;
            let radius = if i % 2 == 0 { outer } else { inner };
            (cx + radius * theta.cos(), cy - radius * theta.sin())
        })
        .collect()
}

/// Diamond vertices (top, right, bottom, left) for a normalized box.
pub fn diamond_points(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<(f64, f64)> {
    let mx = ((x0 + x1) / 2.0).floor();
    let my = ((y0 + y1) / 2.0).floor();
    vec![(mx, y0), (x1, my), (mx, y1), (x0, my)]
}

/// Isosceles triangle vertices (apex top-centre, base along the bottom edge) for a normalized box.
pub fn triangle_points(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<(f64, f64)> {
    let mx = ((x0 + x1) / 2.0).floor();
    vec![(mx, y0), (x0, y1), (x1, y1)]
}

/// Bounding square of a circle centred on the drag start.
///
/// Radius is the truncated start-to-end distance.
pub fn circle_bounds(sx: f64, sy: f64, ex: f64, ey: f64) -> (f64, f64, f64, f64) {
    let r = distance(sx, sy, ex, ey).trunc();
    (sx - r, sy - r, sx + r, sy + r)
}

/// Calculates the two trailing corners of a filled arrowhead at `(ex, ey)`.
///
/// The head points along the direction from `(sx, sy)` to `(ex, ey)`.
///
/// # Returns
/// Array of two points `[(left_x, left_y), (right_x, right_y)]`.
pub fn arrowhead_points(
    sx: f64,
    sy: f64,
    ex: f64,
    ey: f64,
    length: f64,
    spread: f64,
) -> [(f64, f64); 2] {
    let theta = angle(sx, sy, ex, ey);
    [
        (
            ex - length * (theta - spread).cos(),
            ey - length * (theta - spread).sin(),
        ),
        (
            ex - length * (theta + spread).cos(),
            ey - length * (theta + spread).sin(),
        ),
    ]
}

/// Converts a corner-to-corner box into centre and radii for Cairo ellipse rendering.
///
/// # Returns
/// Tuple `(cx, cy, rx, ry)`.
pub fn ellipse_bounds(x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64, f64, f64) {
    let cx = (x1 + x2) / 2.0;
    let cy = (y1 + y2) / 2.0;
    let rx = (x2 - x1).abs() / 2.0;
    let ry = (y2 - y1).abs() / 2.0;
    (cx, cy, rx, ry)
}

/// Scatters `count` integer offsets uniformly inside a disc of `radius`.
///
/// Samples the enclosing square and rejects points outside the circle.
pub fn spray_offsets<R: Rng + ?Sized>(rng: &mut R, radius: i32, count: usize) -> Vec<(i32, i32)> {
    let radius = radius.max(0);
    let r2 = radius * radius;
    let mut offsets = Vec::with_capacity(count);
    while offsets.len() < count {
        let ox = rng.gen_range(-radius..=radius);
        let oy = rng.gen_range(-radius..=radius);
        if ox * ox + oy * oy <= r2 {
            offsets.push((ox, oy));
        }
    }
    offsets
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps colour names and hex strings to Color values.
///
/// Used by the configuration system and the script player.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black", "gray"
/// - `#rgb` and `#rrggbb` hex strings
pub fn name_to_color(name: &str) -> Option<Color> {
    let trimmed = name.trim();
    if trimmed.starts_with('#') {
        return Color::from_hex(trimmed);
    }
    match trimmed.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "gray" | "grey" => Some(GRAY),
        _ => None,
    }
}

// ============================================================================
// Rectangles
// ============================================================================

/// Axis-aligned integer rectangle used for raster patches and dirty tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Builds the smallest integer rectangle covering the floating-point bounds.
    pub fn covering(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<Self> {
        let min_x = min_x.floor() as i32;
        let min_y = min_y.floor() as i32;
        let max_x = (max_x.ceil() as i32).max(min_x + 1);
        let max_y = (max_y.ceil() as i32).max(min_y + 1);
        Self::from_min_max(min_x, min_y, max_x, max_y)
    }

    /// Returns a rectangle that covers both input rectangles.
    pub fn union(self, other: Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Expands the rectangle evenly in all directions by `amount`.
    pub fn inflate(self, amount: i32) -> Rect {
        Rect {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + amount * 2,
            height: self.height + amount * 2,
        }
    }

    /// Clamps the rectangle to `[0, width) x [0, height)`; `None` if nothing remains.
    pub fn clamp_to_bounds(self, width: i32, height: i32) -> Option<Rect> {
        let max_x = (self.x + self.width).clamp(0, width);
        let max_y = (self.y + self.height).clamp(0, height);
        let x = self.x.clamp(0, width);
        let y = self.y.clamp(0, height);
        Self::from_min_max(x, y, max_x, max_y)
    }

    /// Scales the rectangle by independent factors, rounding outward.
    pub fn scaled(self, sx: f64, sy: f64) -> Option<Rect> {
        Self::covering(
            self.x as f64 * sx,
            self.y as f64 * sy,
            (self.x + self.width) as f64 * sx,
            (self.y + self.height) as f64 * sy,
        )
    }

    /// Returns true if the point lies inside the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
