//! Drawing tool selection and per-session tool settings.

use crate::draw::{Color, WHITE};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Drawing tool selection.
///
/// The active tool decides which stroke generator a pointer drag is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Freehand drawing with interpolated round segments
    Pen,
    /// Soft freehand: stippled parallel segments on screen, one full-width raster line
    Brush,
    /// Straight line
    Line,
    /// Axis-aligned rectangle
    Rectangle,
    /// Circle centred on the drag start
    Circle,
    /// Ellipse inscribed in the drag box
    Ellipse,
    /// Line with an arrowhead at the drag end
    Arrow,
    /// Text stamped at the click position
    Text,
    /// Wide translucent marker
    Highlighter,
    /// Random dots scattered around the pointer
    Spray,
    /// Freehand in the page background colour
    Eraser,
    /// Flood fill from the clicked pixel
    Fill,
    Triangle,
    Star,
    Diamond,
    /// Freehand whose width shrinks with pointer speed
    Calligraphy,
    /// Dashed straight line
    Dotted,
    /// Transient pointer trail that is never committed
    Laser,
}

/// Returned when a tool identifier is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool '{0}'")]
pub struct ParseToolError(pub String);

impl ToolKind {
    /// Every tool, in toolbar order.
    pub const ALL: [ToolKind; 18] = [
        ToolKind::Pen,
        ToolKind::Brush,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Ellipse,
        ToolKind::Arrow,
        ToolKind::Text,
        ToolKind::Highlighter,
        ToolKind::Spray,
        ToolKind::Eraser,
        ToolKind::Fill,
        ToolKind::Triangle,
        ToolKind::Star,
        ToolKind::Diamond,
        ToolKind::Calligraphy,
        ToolKind::Dotted,
        ToolKind::Laser,
    ];

    /// Lowercase identifier used in config files, scripts and session metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Brush => "brush",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Arrow => "arrow",
            ToolKind::Text => "text",
            ToolKind::Highlighter => "highlighter",
            ToolKind::Spray => "spray",
            ToolKind::Eraser => "eraser",
            ToolKind::Fill => "fill",
            ToolKind::Triangle => "triangle",
            ToolKind::Star => "star",
            ToolKind::Diamond => "diamond",
            ToolKind::Calligraphy => "calligraphy",
            ToolKind::Dotted => "dotted",
            ToolKind::Laser => "laser",
        }
    }

    /// Capitalized name shown in status messages.
    pub fn label(self) -> String {
        let id = self.as_str();
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Rubber-band shape tools, committed on pointer-up.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            ToolKind::Line
                | ToolKind::Dotted
                | ToolKind::Arrow
                | ToolKind::Rectangle
                | ToolKind::Circle
                | ToolKind::Ellipse
                | ToolKind::Triangle
                | ToolKind::Diamond
                | ToolKind::Star
        )
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = ParseToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = match wanted.as_str() {
            "rect" => "rectangle",
            "dotted_line" | "dotted-line" => "dotted",
            other => other,
        };
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.as_str() == wanted)
            .ok_or_else(|| ParseToolError(s.to_string()))
    }
}

/// Process-wide tool parameters read by every stroke generator.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    pub active_tool: ToolKind,
    pub color: Color,
    /// Pen width in pixels (1-80)
    pub stroke_width: u32,
    /// Fill closed shapes with the pen colour
    pub fill_shapes: bool,
    /// Stroke opacity (0.1-1.0)
    pub opacity: f64,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            active_tool: ToolKind::Pen,
            color: WHITE,
            stroke_width: 4,
            fill_shapes: false,
            opacity: 1.0,
        }
    }
}
