use crate::draw::{RasterError, RasterImage};

use super::InputState;

impl InputState {
    /// Paints the current display composition (page background plus overlay).
    ///
    /// Front ends call this from their draw handler.
    pub fn render_display(&self, ctx: &cairo::Context) -> Result<(), cairo::Error> {
        self.renderer
            .compose(ctx, self.pages.current().background())
    }

    /// Renders what the display currently shows into a standalone image.
    pub fn display_snapshot(&self) -> Result<RasterImage, RasterError> {
        let surface = self
            .renderer
            .compose_to_surface(self.pages.current().background())?;
        let (width, height, stride) = (surface.width(), surface.height(), surface.stride());
        let mut data = Vec::new();
        surface.with_data(|bytes| data.extend_from_slice(bytes))?;
        RasterImage::from_raw(width, height, stride, data)
    }
}
