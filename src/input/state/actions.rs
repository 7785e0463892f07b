use crate::dialogs::Dialogs;
use crate::draw::Color;
use crate::export::{self, ExportFormat};
use crate::history::HistoryOutcome;
use crate::input::tool::ToolKind;
use crate::session;
use log::warn;
use std::path::{Path, PathBuf};

use super::core::{MAX_STROKE_WIDTH, RECENT_COLORS};
use super::InputState;

const CLEAR_PROMPT: &str = "Clear the entire board?";

impl InputState {
    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Reverts the most recent history entry on the current page.
    pub fn undo(&mut self) {
        self.cancel_stroke();
        let outcome = self
            .history
            .undo(self.pages.current_mut(), &mut self.renderer);
        self.report_history("undo", outcome);
    }

    /// Re-applies the most recently undone entry.
    pub fn redo(&mut self) {
        self.cancel_stroke();
        let outcome = self
            .history
            .redo(self.pages.current_mut(), &mut self.renderer);
        self.report_history("redo", outcome);
    }

    fn report_history(&mut self, action: &str, outcome: HistoryOutcome) {
        match outcome {
            HistoryOutcome::Empty => self.set_status(format!("Nothing to {action}")),
            HistoryOutcome::Applied => self.history_status(),
            HistoryOutcome::Failed(err) => self.set_status(format!("{action} failed: {err}")),
        }
    }

    // ------------------------------------------------------------------
    // Tool state
    // ------------------------------------------------------------------

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.cancel_stroke();
        self.tool.active_tool = tool;
        self.set_status(format!("Tool: {}", tool.label()));
    }

    /// Sets the pen colour and moves it to the front of the recent colours.
    pub fn set_color(&mut self, color: Color) {
        self.tool.color = color;
        self.recent_colors.retain(|recent| *recent != color);
        self.recent_colors.push_front(color);
        self.recent_colors.truncate(RECENT_COLORS);
        self.needs_redraw = true;
    }

    /// Asks the user for a pen colour; dismissing keeps the current one.
    pub fn pick_color(&mut self, dialogs: &mut dyn Dialogs) {
        if let Some(color) = dialogs.pick_color() {
            self.set_color(color);
        }
    }

    /// Sets the pen width, clamped to 1-80.
    pub fn set_size(&mut self, size: u32) {
        self.tool.stroke_width = size.clamp(1, MAX_STROKE_WIDTH);
        self.needs_redraw = true;
    }

    /// Grows (positive) or shrinks (negative) the pen by whole size steps.
    pub fn adjust_size(&mut self, steps: i32) {
        let delta = steps.saturating_mul(self.size_step as i32);
        let size = (self.tool.stroke_width as i32).saturating_add(delta);
        self.set_size(size.max(1) as u32);
    }

    /// Sets stroke opacity, clamped to 0.1-1.0.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.tool.opacity = if opacity.is_finite() {
            opacity.clamp(0.1, 1.0)
        } else {
            1.0
        };
        self.needs_redraw = true;
    }

    /// Flips whether closed shapes are filled; returns the new state.
    pub fn toggle_fill_shapes(&mut self) -> bool {
        self.tool.fill_shapes = !self.tool.fill_shapes;
        self.tool.fill_shapes
    }

    /// Shows or hides the grid; returns the new state.
    pub fn toggle_grid(&mut self) -> bool {
        self.needs_redraw = true;
        self.renderer.toggle_grid()
    }

    // ------------------------------------------------------------------
    // Page content
    // ------------------------------------------------------------------

    /// Repaints the current page with a new background colour.
    ///
    /// All raster content is discarded; the previous raster and colour are kept
    /// in a snapshot entry.
    pub fn set_background(&mut self, color: Color) {
        if self.reset_page(color) {
            self.set_status(format!("Background -> {}", color.to_hex()));
        }
    }

    /// Wipes the current page after confirmation; declining does nothing.
    pub fn clear_board(&mut self, dialogs: &mut dyn Dialogs) {
        if !dialogs.confirm(CLEAR_PROMPT) {
            return;
        }
        let background = self.pages.current().background();
        if self.reset_page(background) {
            self.set_status("Board cleared");
        }
    }

    fn reset_page(&mut self, background: Color) -> bool {
        self.cancel_stroke();
        match self.pages.current_mut().reset(background) {
            Ok((prior, prior_background)) => {
                self.history.record_snapshot(prior, prior_background)
            }
            Err(err) => {
                warn!("Could not reset page: {err}");
                self.set_status(format!("Page reset failed: {err}"));
                return false;
            }
        }
        self.renderer.clear_drawing();
        self.refresh_backdrop();
        true
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// Appends a page with the current page's background and switches to it.
    pub fn add_page(&mut self) {
        let background = self.pages.current().background();
        match self.pages.add_page(background) {
            Ok(_) => self.switch_page(),
            Err(err) => {
                warn!("Could not add page: {err}");
                self.set_status(format!("Add page failed: {err}"));
            }
        }
    }

    /// Moves to the next page; no-op on the last one.
    pub fn next_page(&mut self) {
        if self.pages.next() {
            self.switch_page();
        }
    }

    /// Moves to the previous page; no-op on the first one.
    pub fn prev_page(&mut self) {
        if self.pages.prev() {
            self.switch_page();
        }
    }

    /// Resets overlay and history for the page that just became current.
    fn switch_page(&mut self) {
        self.cancel_stroke();
        self.renderer.clear_overlay();
        self.laser_trail.clear();
        self.history.clear();
        self.refresh_backdrop();
        self.set_status(format!(
            "Page {}/{}",
            self.pages.current_index() + 1,
            self.pages.len()
        ));
    }

    /// Adapts the overlay to a new display size.
    pub fn resize_display(&mut self, width: i32, height: i32) {
        if let Err(err) = self
            .renderer
            .resize_display(width, height, self.pages.current())
        {
            warn!("Resize to {width}x{height} failed: {err}");
        }
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Saves the current page raster as PNG at a user-chosen path.
    pub fn save_png(&mut self, dialogs: &mut dyn Dialogs) -> Option<PathBuf> {
        self.save_image(dialogs, ExportFormat::Png)
    }

    /// Saves the current page raster as JPEG at a user-chosen path.
    pub fn save_jpeg(&mut self, dialogs: &mut dyn Dialogs) -> Option<PathBuf> {
        self.save_image(dialogs, ExportFormat::Jpeg)
    }

    fn save_image(&mut self, dialogs: &mut dyn Dialogs, format: ExportFormat) -> Option<PathBuf> {
        let path = dialogs.choose_save_path(format.extension())?;
        self.save_image_to(&path, format)
    }

    /// Saves the current page raster to `path`, reporting the result as status.
    pub fn save_image_to(&mut self, path: &Path, format: ExportFormat) -> Option<PathBuf> {
        let raster = self.pages.current().raster();
        match export::save_raster(raster, path, format, self.export.jpeg_quality) {
            Ok(saved) => {
                let name = saved
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| saved.display().to_string());
                self.set_status(format!("Saved: {name}"));
                Some(saved)
            }
            Err(err) => {
                warn!("Export to {} failed: {err}", path.display());
                self.set_status(format!("Save failed: {err}"));
                None
            }
        }
    }

    /// Writes session metadata JSON to a user-chosen path.
    pub fn export_session(&mut self, dialogs: &mut dyn Dialogs) -> Option<PathBuf> {
        let path = dialogs.choose_save_path("json")?;
        let metadata = session::SessionMetadata::from_input(self);
        match session::save_metadata(&path, &metadata) {
            Ok(()) => {
                self.set_status("Session exported");
                Some(path)
            }
            Err(err) => {
                warn!("Session export to {} failed: {err:#}", path.display());
                self.set_status(format!("Save failed: {err}"));
                None
            }
        }
    }
}
