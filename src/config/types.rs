//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the pen the board starts with. Everything here can be changed at
/// runtime through the tool actions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default pen color - a named color, `#rrggbb`, or an RGB array like `[255, 0, 0]`
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default pen width in pixels (valid range: 1 - 80)
    #[serde(default = "default_size")]
    pub default_size: u32,

    /// Tool selected at startup (pen, brush, line, rectangle, ...)
    #[serde(default = "default_tool")]
    pub default_tool: String,

    /// Stroke opacity (valid range: 0.1 - 1.0)
    #[serde(default = "default_opacity")]
    pub default_opacity: f64,

    /// Fill closed shapes with the pen colour
    #[serde(default)]
    pub fill_shapes: bool,

    /// Font family for the text tool; falls back to "Sans" when not installed
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Number of points on the star tool (valid range: 3 - 12)
    #[serde(default = "default_star_points")]
    pub star_points: usize,

    /// Pen width change per size step (valid range: 1 - 20)
    #[serde(default = "default_size_step")]
    pub size_step: u32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_size: default_size(),
            default_tool: default_tool(),
            default_opacity: default_opacity(),
            fill_shapes: false,
            font_family: default_font_family(),
            star_points: default_star_points(),
            size_step: default_size_step(),
        }
    }
}

/// Page raster settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageConfig {
    /// Raster width in pixels (valid range: 16 - 8192)
    #[serde(default = "default_page_width")]
    pub width: i32,

    /// Raster height in pixels (valid range: 16 - 8192)
    #[serde(default = "default_page_height")]
    pub height: i32,

    /// Background colour of new pages
    #[serde(default = "default_background")]
    pub background: ColorSpec,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: default_page_width(),
            height: default_page_height(),
            background: default_background(),
        }
    }
}

/// Undo/redo settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HistoryConfig {
    /// Entries kept per stack before the oldest is dropped (valid range: 1 - 1000)
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

/// Flood fill settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FillConfig {
    /// Largest summed RGB distance still counted as the seed colour (valid range: 0 - 765)
    #[serde(default = "default_fill_threshold")]
    pub threshold: u32,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            threshold: default_fill_threshold(),
        }
    }
}

/// Grid overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GridConfig {
    /// Show the grid at startup
    #[serde(default)]
    pub visible: bool,

    /// Line spacing in display pixels (valid range: 4 - 400)
    #[serde(default = "default_grid_size")]
    pub size: u32,

    #[serde(default = "default_grid_color")]
    pub color: ColorSpec,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            visible: false,
            size: default_grid_size(),
            color: default_grid_color(),
        }
    }
}

/// Laser pointer settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LaserConfig {
    /// Overlay items kept in the trail (valid range: 4 - 500)
    #[serde(default = "default_trail_capacity")]
    pub trail_capacity: usize,
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            trail_capacity: default_trail_capacity(),
        }
    }
}

/// Image export settings.
///
/// # Example
/// ```toml
/// [export]
/// directory = "~/Pictures/Slateboard"
/// filename_template = "board_%Y%m%d_%H%M%S"
/// jpeg_quality = 90
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory for generated file names (supports ~ for home directory)
    #[serde(default = "default_export_directory")]
    pub directory: String,

    /// Filename template with chrono format specifiers
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// JPEG quality (valid range: 1 - 100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            filename_template: default_filename_template(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("#ffffff".to_string())
}

fn default_size() -> u32 {
    4
}

fn default_tool() -> String {
    "pen".to_string()
}

fn default_opacity() -> f64 {
    1.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_star_points() -> usize {
    5
}

fn default_size_step() -> u32 {
    2
}

fn default_page_width() -> i32 {
    1920
}

fn default_page_height() -> i32 {
    1080
}

fn default_background() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_history_capacity() -> usize {
    200
}

fn default_fill_threshold() -> u32 {
    30
}

fn default_grid_size() -> u32 {
    40
}

fn default_grid_color() -> ColorSpec {
    ColorSpec::Name("#222233".to_string())
}

fn default_trail_capacity() -> usize {
    60
}

fn default_export_directory() -> String {
    "~/Pictures/Slateboard".to_string()
}

fn default_filename_template() -> String {
    "board_%Y%m%d_%H%M%S".to_string()
}

fn default_jpeg_quality() -> u8 {
    95
}
