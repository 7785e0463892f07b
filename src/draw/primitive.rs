//! Vector primitives shown on the live overlay.

use super::color::Color;
use super::font::FontDescriptor;

/// Partial-coverage fill pattern for soft tools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stipple {
    #[default]
    Solid,
    /// Half coverage (brush)
    Gray50,
    /// Quarter coverage (highlighter)
    Gray25,
}

impl Stipple {
    /// Fraction of pixels covered by the pattern.
    pub fn coverage(self) -> f64 {
        match self {
            Stipple::Solid => 1.0,
            Stipple::Gray50 => 0.5,
            Stipple::Gray25 => 0.25,
        }
    }
}

/// Arrow cap drawn at the end of a line.
///
/// Mirrors the classic `(d1, d2, d3)` arrow shape: distance from neck to tip,
/// distance from trailing points to tip, and how far the trailing points sit
/// outside the line edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowCap {
    pub neck: f64,
    pub trail: f64,
    pub flare: f64,
}

impl Default for ArrowCap {
    fn default() -> Self {
        Self {
            neck: 16.0,
            trail: 20.0,
            flare: 6.0,
        }
    }
}

/// Outline styling shared by all stroked primitives.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub alpha: f64,
    pub stipple: Stipple,
    /// `(on, off)` dash lengths
    pub dash: Option<(f64, f64)>,
    pub round_caps: bool,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            alpha: 1.0,
            stipple: Stipple::Solid,
            dash: None,
            round_caps: true,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_stipple(mut self, stipple: Stipple) -> Self {
        self.stipple = stipple;
        self
    }

    pub fn with_dash(mut self, on: f64, off: f64) -> Self {
        self.dash = Some((on, off));
        self
    }

    pub fn with_butt_caps(mut self) -> Self {
        self.round_caps = false;
        self
    }

    /// Effective source alpha after stipple coverage.
    pub fn effective_alpha(&self) -> f64 {
        (self.alpha * self.stipple.coverage()).clamp(0.0, 1.0)
    }
}

/// A display-only drawing primitive.
///
/// Rectangles and ovals accept corners in any order.
#[derive(Clone, Debug)]
pub enum Primitive {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        style: StrokeStyle,
        arrow: Option<ArrowCap>,
    },
    Rect {
        corner_a: (f64, f64),
        corner_b: (f64, f64),
        outline: StrokeStyle,
        fill: Option<Color>,
    },
    Oval {
        corner_a: (f64, f64),
        corner_b: (f64, f64),
        outline: StrokeStyle,
        fill: Option<Color>,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        outline: StrokeStyle,
        fill: Option<Color>,
    },
    /// Text anchored at its top-left corner
    Text {
        x: f64,
        y: f64,
        text: String,
        color: Color,
        alpha: f64,
        size: f64,
        font: FontDescriptor,
    },
    /// Backdrop image painted at the display origin
    Image { surface: cairo::ImageSurface },
}

impl Primitive {
    /// Short tag used in logs and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Line { arrow: Some(_), .. } => "arrow",
            Primitive::Line { .. } => "line",
            Primitive::Rect { .. } => "rect",
            Primitive::Oval { .. } => "oval",
            Primitive::Polygon { .. } => "polygon",
            Primitive::Text { .. } => "text",
            Primitive::Image { .. } => "image",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::RED;

    #[test]
    fn stipple_scales_alpha() {
        let style = StrokeStyle::new(RED, 4.0)
            .with_alpha(0.8)
            .with_stipple(Stipple::Gray25);
        assert!((style.effective_alpha() - 0.2).abs() < 1e-9);
        assert_eq!(StrokeStyle::new(RED, 1.0).effective_alpha(), 1.0);
    }

    #[test]
    fn kind_distinguishes_arrow_lines() {
        let line = Primitive::Line {
            from: (0.0, 0.0),
            to: (1.0, 1.0),
            style: StrokeStyle::new(RED, 1.0),
            arrow: None,
        };
        let arrow = Primitive::Line {
            from: (0.0, 0.0),
            to: (1.0, 1.0),
            style: StrokeStyle::new(RED, 1.0),
            arrow: Some(ArrowCap::default()),
        };
        assert_eq!(line.kind(), "line");
        assert_eq!(arrow.kind(), "arrow");
    }
}
