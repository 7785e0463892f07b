//! Dual-buffer renderer: keeps the vector overlay in step with the page raster.
//!
//! Committed strokes show up purely as overlay primitives stacked on the last
//! backdrop. Only pixel-level edits (fill, clear, background change, history
//! restores) resample the raster into a new backdrop image.

use crate::draw::{
    Color, Layer, Overlay, OverlayHandle, Page, Primitive, RasterError, StrokeStyle,
};
use log::debug;

/// Grid overlay settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    pub visible: bool,
    /// Spacing between grid lines in display pixels
    pub size: u32,
    pub color: Color,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: false,
            size: 40,
            color: Color::new(0x22, 0x22, 0x33),
        }
    }
}

/// Owner of the display overlay, its backdrop image and grid lines.
#[derive(Debug)]
pub struct Renderer {
    overlay: Overlay,
    display_width: i32,
    display_height: i32,
    grid: GridSettings,
    backdrop: Option<OverlayHandle>,
    grid_lines: Vec<OverlayHandle>,
}

impl Renderer {
    pub fn new(display_width: i32, display_height: i32, grid: GridSettings) -> Self {
        let mut renderer = Self {
            overlay: Overlay::new(),
            display_width: display_width.max(1),
            display_height: display_height.max(1),
            grid,
            backdrop: None,
            grid_lines: Vec::new(),
        };
        renderer.reassert_grid();
        renderer
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }

    pub fn display_size(&self) -> (i32, i32) {
        (self.display_width, self.display_height)
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    /// Display-to-raster scale factors for `page`.
    pub fn raster_scale(&self, page: &Page) -> (f64, f64) {
        (
            page.width() as f64 / self.display_width as f64,
            page.height() as f64 / self.display_height as f64,
        )
    }

    /// Resamples the page raster to the display size and installs it as the lowest overlay element.
    ///
    /// Replaces any previous backdrop and reasserts the grid afterwards.
    pub fn render_backdrop(&mut self, page: &Page) -> Result<(), RasterError> {
        let surface = cairo::ImageSurface::create(
            cairo::Format::Rgb24,
            self.display_width,
            self.display_height,
        )?;
        {
            let ctx = cairo::Context::new(&surface)?;
            let (sx, sy) = self.raster_scale(page);
            ctx.scale(1.0 / sx, 1.0 / sy);
            ctx.set_source_surface(page.raster().surface(), 0.0, 0.0)?;
            ctx.source().set_filter(cairo::Filter::Best);
            ctx.set_operator(cairo::Operator::Source);
            ctx.paint()?;
        }
        surface.flush();

        if let Some(old) = self.backdrop.take() {
            self.overlay.remove(old);
        }
        self.backdrop = Some(
            self.overlay
                .insert_bottom(Layer::Backdrop, Primitive::Image { surface }),
        );
        debug!(
            "Backdrop rendered: {}x{} raster -> {}x{} display",
            page.width(),
            page.height(),
            self.display_width,
            self.display_height
        );

        self.reassert_grid();
        Ok(())
    }

    pub fn has_backdrop(&self) -> bool {
        self.backdrop
            .is_some_and(|handle| self.overlay.contains(handle))
    }

    /// Drops every overlay primitive, then puts the grid back if enabled.
    pub fn clear_overlay(&mut self) {
        self.overlay.clear();
        self.backdrop = None;
        self.grid_lines.clear();
        self.reassert_grid();
    }

    /// Drops committed drawing and preview primitives, keeping backdrop, grid and laser trail.
    pub fn clear_drawing(&mut self) {
        self.overlay.clear_layer(Layer::Drawing);
        self.overlay.clear_layer(Layer::Preview);
    }

    /// Flips grid visibility; returns the new state.
    pub fn toggle_grid(&mut self) -> bool {
        let visible = !self.grid.visible;
        self.set_grid_visible(visible);
        visible
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.grid.visible = visible;
        self.reassert_grid();
    }

    /// Redraws the grid on top of the overlay when visible, removes it otherwise.
    pub fn reassert_grid(&mut self) {
        for handle in self.grid_lines.drain(..) {
            self.overlay.remove(handle);
        }
        if !self.grid.visible || self.grid.size == 0 {
            return;
        }

        let (w, h) = (self.display_width as f64, self.display_height as f64);
        let style = StrokeStyle::new(self.grid.color, 1.0)
            .with_dash(2.0, 4.0)
            .with_butt_caps();
        let step = self.grid.size as usize;

        let verticals = (0..self.display_width)
            .step_by(step)
            .map(|x| ((x as f64, 0.0), (x as f64, h)));
        let horizontals = (0..self.display_height)
            .step_by(step)
            .map(|y| ((0.0, y as f64), (w, y as f64)));
        for (from, to) in verticals.chain(horizontals).collect::<Vec<_>>() {
            let handle = self.overlay.insert(
                Layer::Grid,
                Primitive::Line {
                    from,
                    to,
                    style: style.clone(),
                    arrow: None,
                },
            );
            self.grid_lines.push(handle);
        }
    }

    /// Changes the display size, re-laying the grid and the backdrop for `page`.
    pub fn resize_display(
        &mut self,
        width: i32,
        height: i32,
        page: &Page,
    ) -> Result<(), RasterError> {
        self.display_width = width.max(1);
        self.display_height = height.max(1);
        if self.has_backdrop() {
            self.render_backdrop(page)
        } else {
            self.reassert_grid();
            Ok(())
        }
    }

    /// Paints `background` then every overlay primitive bottom-to-top.
    pub fn compose(&self, ctx: &cairo::Context, background: Color) -> Result<(), cairo::Error> {
        let (r, g, b) = background.to_cairo();
        ctx.save()?;
        ctx.set_source_rgb(r, g, b);
        ctx.set_operator(cairo::Operator::Source);
        ctx.paint()?;
        ctx.restore()?;
        self.overlay.render(ctx);
        Ok(())
    }

    /// Renders the current display composition into a new image.
    pub fn compose_to_surface(&self, background: Color) -> Result<cairo::ImageSurface, RasterError> {
        let surface = cairo::ImageSurface::create(
            cairo::Format::Rgb24,
            self.display_width,
            self.display_height,
        )?;
        {
            let ctx = cairo::Context::new(&surface)?;
            self.compose(&ctx, background)?;
        }
        surface.flush();
        Ok(surface)
    }
}
