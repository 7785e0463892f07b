use crate::dialogs::Dialogs;
use crate::draw::render_raster_ops;
use crate::history::RasterDiff;
use crate::input::{events::MouseButton, tool::ToolKind};
use log::{debug, warn};

use super::{ActiveStroke, DrawingState, InputState};

impl InputState {
    /// Processes a mouse button press event.
    ///
    /// # Arguments
    /// * `button` - Which mouse button was pressed
    /// * `x` - Pointer X coordinate in display space
    /// * `y` - Pointer Y coordinate in display space
    /// * `dialogs` - Prompts for the text tool
    ///
    /// # Behavior
    /// - Left click with Text or Fill: acts immediately and stays Idle
    /// - Left click with any other tool: starts a stroke at the pointer
    /// - Right click: cancels the stroke in progress
    pub fn on_mouse_press(&mut self, button: MouseButton, x: f64, y: f64, dialogs: &mut dyn Dialogs) {
        match button {
            MouseButton::Left => {
                if self.is_drawing() {
                    return;
                }
                let tool = self.tool.active_tool;
                match tool {
                    ToolKind::Text => self.place_text(x, y, dialogs),
                    ToolKind::Fill => self.fill_at(x, y),
                    _ => {
                        let color = self.effective_color(tool);
                        self.state = DrawingState::Drawing(ActiveStroke::new(
                            tool,
                            (x, y),
                            color,
                            self.tool.stroke_width,
                            self.tool.opacity,
                        ));
                        self.needs_redraw = true;
                    }
                }
            }
            MouseButton::Right => self.cancel_stroke(),
            MouseButton::Middle => {}
        }
    }

    /// Processes pointer motion while a button is held.
    ///
    /// Freehand tools extend the overlay immediately and queue their raster
    /// writes; shape tools redraw the rubber-band preview; the laser grows its
    /// transient trail.
    pub fn on_mouse_motion(&mut self, x: f64, y: f64) {
        let DrawingState::Drawing(mut stroke) = std::mem::take(&mut self.state) else {
            return;
        };

        let to = (x, y);
        match stroke.tool {
            ToolKind::Pen | ToolKind::Eraser => self.draw_freehand(&mut stroke, to),
            ToolKind::Brush => self.draw_brush(&mut stroke, to),
            ToolKind::Calligraphy => self.draw_calligraphy(&mut stroke, to),
            ToolKind::Highlighter => self.draw_highlighter(&mut stroke, to),
            ToolKind::Spray => self.draw_spray(&mut stroke, to),
            ToolKind::Laser => self.draw_laser(&stroke, to),
            tool if tool.is_shape() => self.preview_shape(&mut stroke, to),
            _ => {}
        }

        stroke.last = to;
        self.state = DrawingState::Drawing(stroke);
        self.needs_redraw = true;
    }

    /// Processes mouse button release events.
    ///
    /// # Behavior
    /// When the left button is released during a stroke:
    /// - Shape tools commit the normalized shape to both buffers
    /// - The laser trail is cleared
    /// - Queued raster writes are replayed and one history entry is pushed
    ///   when the stroke produced overlay primitives
    pub fn on_mouse_release(&mut self, button: MouseButton, x: f64, y: f64) {
        if button != MouseButton::Left {
            return;
        }
        let DrawingState::Drawing(mut stroke) = std::mem::take(&mut self.state) else {
            return;
        };

        if stroke.tool.is_shape() {
            self.finalize_shape(&mut stroke, (x, y));
        } else if stroke.tool == ToolKind::Laser {
            self.clear_laser();
        }

        self.commit_stroke(stroke);
        self.needs_redraw = true;
    }

    /// Abandons the stroke in progress without touching the raster.
    pub fn cancel_stroke(&mut self) {
        let DrawingState::Drawing(stroke) = std::mem::take(&mut self.state) else {
            return;
        };
        let overlay = self.renderer.overlay_mut();
        for handle in stroke.handles.iter().chain(stroke.preview.iter()) {
            overlay.remove(*handle);
        }
        self.clear_laser();
        debug!("Cancelled {} stroke", stroke.tool);
        self.needs_redraw = true;
    }

    /// Replays the stroke's raster writes and records it in history.
    ///
    /// Strokes without overlay primitives (laser, empty drags) leave no entry.
    pub(crate) fn commit_stroke(&mut self, mut stroke: ActiveStroke) {
        if stroke.handles.is_empty() {
            return;
        }

        let diff = match self.replay_ops(&mut stroke) {
            Ok(diff) => diff,
            Err(err) => {
                warn!("Raster write for {} stroke failed: {err}", stroke.tool);
                None
            }
        };
        debug!(
            "Committed {} stroke: {} overlay items, {} raster ops",
            stroke.tool,
            stroke.handles.len(),
            stroke.ops.len()
        );
        self.history.record_itemized(stroke.handles, diff);
        self.history_status();
    }

    /// Writes queued ops through the page pen, capturing the touched area before and after.
    fn replay_ops(
        &self,
        stroke: &mut ActiveStroke,
    ) -> Result<Option<RasterDiff>, crate::draw::RasterError> {
        if stroke.ops.is_empty() {
            return Ok(None);
        }
        let page = self.pages.current();
        let scale = self.renderer.raster_scale(page);
        let area = stroke.dirty.take_bounds(scale, page.width(), page.height());

        let before = match area {
            Some(rect) => page.raster().crop(rect)?,
            None => None,
        };
        render_raster_ops(page.pen().context(), &stroke.ops, scale, stroke.opacity)?;
        let after = match area {
            Some(rect) => page.raster().crop(rect)?,
            None => None,
        };

        Ok(before
            .zip(after)
            .map(|(before, after)| RasterDiff { before, after }))
    }
}
