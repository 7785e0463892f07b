//! Drawing state machine and board context.

use crate::draw::{
    BLACK, Color, DirtyTracker, FontDescriptor, Layer, OverlayHandle, Page, PageSet, Primitive,
    RasterError, RasterOp, StrokeGroup,
};
use crate::export::ExportSettings;
use crate::history::{DEFAULT_CAPACITY, History};
use crate::input::tool::{ToolKind, ToolState};
use crate::renderer::{GridSettings, Renderer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;

/// Number of recently used colours remembered for quick access.
pub const RECENT_COLORS: usize = 12;

/// Largest pen width accepted by [`InputState::set_size`].
pub const MAX_STROKE_WIDTH: u32 = 80;

/// Everything needed to build an [`InputState`].
///
/// Usually derived from the configuration file via
/// [`Config::board_settings`](crate::config::Config::board_settings).
#[derive(Debug, Clone)]
pub struct BoardSettings {
    /// Raster size of every page
    pub page_width: i32,
    pub page_height: i32,
    /// Background colour of the first page
    pub background: Color,
    /// Size of the display the overlay is composed for
    pub display_width: i32,
    pub display_height: i32,
    pub history_capacity: usize,
    /// Colour distance (0-765) still counted as part of a fill region
    pub fill_threshold: u32,
    pub grid: GridSettings,
    /// Laser overlay items kept before the oldest are dropped
    pub laser_capacity: usize,
    pub font: FontDescriptor,
    pub star_points: usize,
    /// Pen width change per size step
    pub size_step: u32,
    pub tool: ToolState,
    pub export: ExportSettings,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            page_width: 1920,
            page_height: 1080,
            background: BLACK,
            display_width: 1920,
            display_height: 1080,
            history_capacity: DEFAULT_CAPACITY,
            fill_threshold: 30,
            grid: GridSettings::default(),
            laser_capacity: 60,
            font: FontDescriptor::default(),
            star_points: 5,
            size_step: 2,
            tool: ToolState::default(),
            export: ExportSettings::default(),
        }
    }
}

/// Current drawing mode state machine.
///
/// Text and fill act on pointer-down and never leave `Idle`.
#[derive(Debug, Default)]
pub enum DrawingState {
    /// Not actively drawing - waiting for user input
    #[default]
    Idle,
    /// Pointer held down with a drag tool
    Drawing(ActiveStroke),
}

/// One logical stroke between pointer-down and pointer-up.
#[derive(Debug)]
pub struct ActiveStroke {
    /// Tool the stroke was started with
    pub tool: ToolKind,
    /// Pen colour at pointer-down (page background for the eraser)
    pub color: Color,
    /// Pen width at pointer-down
    pub size: u32,
    /// Opacity at pointer-down
    pub opacity: f64,
    /// Fixed drag origin for shapes
    pub start: (f64, f64),
    /// Previous pointer position
    pub last: (f64, f64),
    /// Overlay primitives committed by this stroke
    pub handles: Vec<OverlayHandle>,
    /// Opacity group shared by `handles`, allocated with the first primitive
    pub group: Option<StrokeGroup>,
    /// Raster writes queued for pointer-up, in display coordinates
    pub ops: Vec<RasterOp>,
    /// Rubber-band preview of a shape drag
    pub preview: Option<OverlayHandle>,
    /// Display area touched by `ops`
    pub dirty: DirtyTracker,
}

impl ActiveStroke {
    pub fn new(tool: ToolKind, start: (f64, f64), color: Color, size: u32, opacity: f64) -> Self {
        Self {
            tool,
            color,
            size,
            opacity,
            start,
            last: start,
            handles: Vec::new(),
            group: None,
            ops: Vec::new(),
            preview: None,
            dirty: DirtyTracker::new(),
        }
    }

    /// Queues a raster write and grows the dirty area.
    pub fn push_op(&mut self, op: RasterOp) {
        self.dirty.mark_op(&op);
        self.ops.push(op);
    }
}

/// Board context threaded through every pointer event and UI request.
///
/// Owns the page set, the dual-buffer renderer, the history and the tool
/// parameters; nothing else in the crate keeps board state.
#[derive(Debug)]
pub struct InputState {
    /// Active tool, colour, width, fill and opacity
    pub tool: ToolState,
    pub pages: PageSet,
    pub renderer: Renderer,
    pub history: History,
    /// Current drawing mode state machine
    pub state: DrawingState,
    /// Font for the text tool, already resolved against installed families
    pub font_descriptor: FontDescriptor,
    pub star_points: usize,
    pub fill_threshold: u32,
    pub size_step: u32,
    pub export: ExportSettings,
    /// Most recent first, no duplicates
    pub recent_colors: VecDeque<Color>,
    /// Last status message shown to the user
    pub status: String,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
    pub(crate) laser_trail: VecDeque<OverlayHandle>,
    pub(crate) laser_capacity: usize,
    pub(crate) rng: StdRng,
}

impl InputState {
    /// Creates a board with one page.
    pub fn new(settings: BoardSettings) -> Result<Self, RasterError> {
        Self::build(settings, StdRng::from_entropy())
    }

    /// Creates a board whose spray pattern is reproducible.
    pub fn with_rng_seed(settings: BoardSettings, seed: u64) -> Result<Self, RasterError> {
        Self::build(settings, StdRng::seed_from_u64(seed))
    }

    fn build(settings: BoardSettings, rng: StdRng) -> Result<Self, RasterError> {
        let pages = PageSet::new(
            settings.page_width,
            settings.page_height,
            settings.background,
        )?;
        let renderer = Renderer::new(
            settings.display_width,
            settings.display_height,
            settings.grid,
        );

        let mut tool = settings.tool;
        tool.stroke_width = tool.stroke_width.clamp(1, MAX_STROKE_WIDTH);
        tool.opacity = tool.opacity.clamp(0.1, 1.0);

        log::info!(
            "Board ready: {}x{} page, {} background, tool {}",
            settings.page_width,
            settings.page_height,
            settings.background.to_hex(),
            tool.active_tool
        );

        Ok(Self {
            recent_colors: VecDeque::from([tool.color]),
            tool,
            pages,
            renderer,
            history: History::new(settings.history_capacity),
            state: DrawingState::Idle,
            font_descriptor: settings.font.resolve(),
            star_points: settings.star_points.max(2),
            fill_threshold: settings.fill_threshold,
            size_step: settings.size_step.max(1),
            export: settings.export,
            status: String::new(),
            needs_redraw: true,
            laser_trail: VecDeque::new(),
            laser_capacity: settings.laser_capacity.max(1),
            rng,
        })
    }

    /// Page currently receiving input.
    pub fn current_page(&self) -> &Page {
        self.pages.current()
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawingState::Drawing(_))
    }

    /// Number of live laser overlay items.
    pub fn laser_trail_len(&self) -> usize {
        self.laser_trail.len()
    }

    /// Colour a new stroke with `tool` paints in.
    pub(crate) fn effective_color(&self, tool: ToolKind) -> Color {
        if tool == ToolKind::Eraser {
            self.pages.current().background()
        } else {
            self.tool.color
        }
    }

    /// Replaces the status line and logs it.
    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        log::info!("{}", self.status);
        self.needs_redraw = true;
    }

    /// Status line summarising history depth.
    pub(crate) fn history_status(&mut self) {
        let message = format!(
            "Undo: {}  |  Redo: {}",
            self.history.undo_len(),
            self.history.redo_len()
        );
        self.set_status(message);
    }

    /// Adds a committed drawing primitive on top of the overlay.
    ///
    /// The primitive joins the stroke's group, so it should be styled opaque;
    /// the group carries the stroke opacity.
    pub(crate) fn add_drawing(&mut self, stroke: &mut ActiveStroke, primitive: Primitive) {
        let overlay = self.renderer.overlay_mut();
        let opacity = stroke.opacity;
        let group = *stroke
            .group
            .get_or_insert_with(|| overlay.new_group(opacity));
        let handle = overlay.insert_grouped(Layer::Drawing, group, primitive);
        stroke.handles.push(handle);
    }

    /// Re-renders the backdrop from the current page, reporting failures as status.
    pub(crate) fn refresh_backdrop(&mut self) {
        if let Err(err) = self.renderer.render_backdrop(self.pages.current()) {
            log::warn!("Backdrop render failed: {err}");
            self.set_status(format!("Render failed: {err}"));
        }
        self.needs_redraw = true;
    }
}
