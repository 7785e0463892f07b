//! A single drawing page: background colour plus its raster backing store.

use super::color::Color;
use super::raster::{RasterError, RasterImage, RasterPen};

/// One independent drawing surface.
///
/// The page exclusively owns its raster and the pen bound to it. Every raster
/// replacement binds the new pen first and swaps both together, so the pen
/// never targets a raster the page no longer owns.
#[derive(Debug)]
pub struct Page {
    background: Color,
    raster: RasterImage,
    pen: RasterPen,
}

impl Page {
    /// Creates a page of the given size filled with `background`.
    pub fn new(width: i32, height: i32, background: Color) -> Result<Self, RasterError> {
        let raster = RasterImage::new(width, height, background)?;
        let pen = RasterPen::bind(&raster)?;
        Ok(Self {
            background,
            raster,
            pen,
        })
    }

    pub fn width(&self) -> i32 {
        self.raster.width()
    }

    pub fn height(&self) -> i32 {
        self.raster.height()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn raster(&self) -> &RasterImage {
        &self.raster
    }

    /// Drawing handle bound to the current raster.
    pub fn pen(&self) -> &RasterPen {
        &self.pen
    }

    /// Installs `raster` (same dimensions) and returns the one it replaces.
    pub fn replace_raster(&mut self, raster: RasterImage) -> Result<RasterImage, RasterError> {
        if raster.width() != self.width() || raster.height() != self.height() {
            return Err(RasterError::SizeMismatch {
                width: self.width(),
                height: self.height(),
                actual_width: raster.width(),
                actual_height: raster.height(),
            });
        }
        let pen = RasterPen::bind(&raster)?;
        self.pen = pen;
        Ok(std::mem::replace(&mut self.raster, raster))
    }

    /// Installs both raster and background, returning the previous pair.
    pub fn swap_contents(
        &mut self,
        raster: RasterImage,
        background: Color,
    ) -> Result<(RasterImage, Color), RasterError> {
        let old_raster = self.replace_raster(raster)?;
        let old_background = std::mem::replace(&mut self.background, background);
        Ok((old_raster, old_background))
    }

    /// Wipes the page to a fresh raster filled with `background`.
    ///
    /// Returns the previous raster and background for history.
    pub fn reset(&mut self, background: Color) -> Result<(RasterImage, Color), RasterError> {
        let fresh = RasterImage::new(self.width(), self.height(), background)?;
        self.swap_contents(fresh, background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, RED, WHITE};

    #[test]
    fn pen_follows_replaced_raster() {
        let mut page = Page::new(8, 8, BLACK).unwrap();
        let old = page
            .replace_raster(RasterImage::new(8, 8, WHITE).unwrap())
            .unwrap();

        page.pen().context().set_source_rgb(1.0, 0.0, 0.0);
        page.pen().context().paint().unwrap();

        assert_eq!(page.raster().pixel(1, 1), Some(RED));
        assert_eq!(old.pixel(1, 1), Some(BLACK));
    }

    #[test]
    fn mismatched_raster_is_rejected() {
        let mut page = Page::new(8, 8, BLACK).unwrap();
        let result = page.replace_raster(RasterImage::new(4, 8, BLACK).unwrap());
        assert!(matches!(result, Err(RasterError::SizeMismatch { .. })));
        assert_eq!(page.width(), 8);
    }

    #[test]
    fn reset_returns_prior_state() {
        let mut page = Page::new(4, 4, BLACK).unwrap();
        let (old, old_bg) = page.reset(WHITE).unwrap();
        assert_eq!(old_bg, BLACK);
        assert_eq!(old.pixel(0, 0), Some(BLACK));
        assert_eq!(page.background(), WHITE);
        assert_eq!(page.raster().pixel(3, 3), Some(WHITE));
    }
}
