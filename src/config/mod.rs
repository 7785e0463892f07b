//! Configuration file support for slateboard.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/slateboard/config.toml`. Settings include the starting pen,
//! page size and background, history depth, fill tolerance, grid, laser and export
//! preferences.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{
    DrawingConfig, ExportConfig, FillConfig, GridConfig, HistoryConfig, LaserConfig, PageConfig,
};

use crate::draw::{BLACK, FontDescriptor, WHITE};
use crate::export::{self, ExportSettings};
use crate::input::{BoardSettings, MAX_STROKE_WIDTH, ToolKind, ToolState};
use crate::renderer::GridSettings;
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "red"
/// default_size = 6
/// default_tool = "brush"
///
/// [page]
/// width = 1280
/// height = 720
/// background = "#ffffff"
///
/// [history]
/// capacity = 100
///
/// [grid]
/// visible = true
/// size = 32
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Starting pen (color, size, tool, opacity)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Page raster size and background
    #[serde(default)]
    pub page: PageConfig,

    /// Undo/redo depth
    #[serde(default)]
    pub history: HistoryConfig,

    /// Flood fill tolerance
    #[serde(default)]
    pub fill: FillConfig,

    /// Grid overlay
    #[serde(default)]
    pub grid: GridConfig,

    /// Laser pointer trail
    #[serde(default)]
    pub laser: LaserConfig,

    /// Image export location and quality
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or reset to their
    /// default) and a warning is logged.
    fn validate_and_clamp(&mut self) {
        let drawing = &mut self.drawing;

        if !(1..=MAX_STROKE_WIDTH).contains(&drawing.default_size) {
            log::warn!(
                "Invalid default_size {}, clamping to 1-{} range",
                drawing.default_size,
                MAX_STROKE_WIDTH
            );
            drawing.default_size = drawing.default_size.clamp(1, MAX_STROKE_WIDTH);
        }

        if !(0.1..=1.0).contains(&drawing.default_opacity) {
            log::warn!(
                "Invalid default_opacity {:.2}, clamping to 0.1-1.0 range",
                drawing.default_opacity
            );
            drawing.default_opacity = if drawing.default_opacity.is_nan() {
                1.0
            } else {
                drawing.default_opacity.clamp(0.1, 1.0)
            };
        }

        if drawing.default_tool.parse::<ToolKind>().is_err() {
            log::warn!(
                "Invalid default_tool '{}', falling back to 'pen'",
                drawing.default_tool
            );
            drawing.default_tool = ToolKind::Pen.as_str().to_string();
        }

        if drawing.default_color.parse().is_none() {
            log::warn!(
                "Invalid default_color {:?}, falling back to white",
                drawing.default_color
            );
            drawing.default_color = ColorSpec::Name(WHITE.to_hex());
        }

        if !(3..=12).contains(&drawing.star_points) {
            log::warn!(
                "Invalid star_points {}, clamping to 3-12 range",
                drawing.star_points
            );
            drawing.star_points = drawing.star_points.clamp(3, 12);
        }

        if !(1..=20).contains(&drawing.size_step) {
            log::warn!(
                "Invalid size_step {}, clamping to 1-20 range",
                drawing.size_step
            );
            drawing.size_step = drawing.size_step.clamp(1, 20);
        }

        // Page size: 16 - 8192
        for (name, value) in [
            ("width", &mut self.page.width),
            ("height", &mut self.page.height),
        ] {
            if !(16..=8192).contains(&*value) {
                log::warn!("Invalid page {name} {value}, clamping to 16-8192 range");
                *value = (*value).clamp(16, 8192);
            }
        }

        if self.page.background.parse().is_none() {
            log::warn!(
                "Invalid page background {:?}, falling back to black",
                self.page.background
            );
            self.page.background = ColorSpec::Name(BLACK.to_hex());
        }

        if !(1..=1000).contains(&self.history.capacity) {
            log::warn!(
                "Invalid history capacity {}, clamping to 1-1000 range",
                self.history.capacity
            );
            self.history.capacity = self.history.capacity.clamp(1, 1000);
        }

        if self.fill.threshold > 765 {
            log::warn!(
                "Invalid fill threshold {}, clamping to 0-765 range",
                self.fill.threshold
            );
            self.fill.threshold = 765;
        }

        if !(4..=400).contains(&self.grid.size) {
            log::warn!(
                "Invalid grid size {}, clamping to 4-400 range",
                self.grid.size
            );
            self.grid.size = self.grid.size.clamp(4, 400);
        }

        if !(4..=500).contains(&self.laser.trail_capacity) {
            log::warn!(
                "Invalid laser trail_capacity {}, clamping to 4-500 range",
                self.laser.trail_capacity
            );
            self.laser.trail_capacity = self.laser.trail_capacity.clamp(4, 500);
        }

        if !(1..=100).contains(&self.export.jpeg_quality) {
            log::warn!(
                "Invalid jpeg_quality {}, clamping to 1-100 range",
                self.export.jpeg_quality
            );
            self.export.jpeg_quality = self.export.jpeg_quality.clamp(1, 100);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/slateboard/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("slateboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates the configuration file at `path`.
    ///
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses TOML text and clamps the result.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text)?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> Schema {
        schemars::schema_for!(Config)
    }

    /// Builds the board settings for a display of the page's own size.
    pub fn board_settings(&self) -> BoardSettings {
        let tool = ToolState {
            active_tool: self.drawing.default_tool.parse().unwrap_or(ToolKind::Pen),
            color: self.drawing.default_color.to_color(WHITE),
            stroke_width: self.drawing.default_size,
            fill_shapes: self.drawing.fill_shapes,
            opacity: self.drawing.default_opacity,
        };

        BoardSettings {
            page_width: self.page.width,
            page_height: self.page.height,
            background: self.page.background.to_color(BLACK),
            display_width: self.page.width,
            display_height: self.page.height,
            history_capacity: self.history.capacity,
            fill_threshold: self.fill.threshold,
            grid: GridSettings {
                visible: self.grid.visible,
                size: self.grid.size,
                color: self.grid.color.to_color(GridSettings::default().color),
            },
            laser_capacity: self.laser.trail_capacity,
            font: FontDescriptor::new(self.drawing.font_family.clone(), "normal".to_string()),
            star_points: self.drawing.star_points,
            size_step: self.drawing.size_step,
            tool,
            export: ExportSettings {
                directory: export::expand_tilde(&self.export.directory),
                filename_template: self.export.filename_template.clone(),
                jpeg_quality: self.export.jpeg_quality,
            },
        }
    }
}
