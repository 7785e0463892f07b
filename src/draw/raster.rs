//! Raster backing store for a page and the drawing handle bound to it.
//!
//! Pixels live in a Cairo RGB24 image surface (`0x00RRGGBB` native-endian words).
//! All raster writes go through a [`RasterPen`]; pixel-level rewrites (flood fill,
//! snapshot restore) build a fresh [`RasterImage`] that replaces the old one, and
//! the owner rebinds its pen in the same step.

use super::color::Color;
use crate::util::Rect;
use cairo::{Format, ImageSurface};
use std::io::Write;
use thiserror::Error;

const FORMAT: Format = Format::Rgb24;

/// Errors raised while creating, reading or writing raster buffers.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid raster dimensions {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error("Raster is {actual_width}x{actual_height}, page expects {width}x{height}")]
    SizeMismatch {
        width: i32,
        height: i32,
        actual_width: i32,
        actual_height: i32,
    },

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Raster data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] cairo::IoError),
}

/// Mutable 2D RGB pixel buffer with fixed dimensions.
#[derive(Debug)]
pub struct RasterImage {
    surface: ImageSurface,
}

impl RasterImage {
    /// Creates a raster of the given size filled with `background`.
    pub fn new(width: i32, height: i32, background: Color) -> Result<Self, RasterError> {
        if width <= 0 || height <= 0 {
            return Err(RasterError::InvalidSize { width, height });
        }
        let surface = ImageSurface::create(FORMAT, width, height)?;
        {
            let ctx = cairo::Context::new(&surface)?;
            let (r, g, b) = background.to_cairo();
            ctx.set_source_rgb(r, g, b);
            ctx.set_operator(cairo::Operator::Source);
            ctx.paint()?;
        }
        surface.flush();
        Ok(Self { surface })
    }

    /// Wraps raw RGB24 rows (`stride` bytes each) in a new raster.
    pub(crate) fn from_raw(
        width: i32,
        height: i32,
        stride: i32,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        if width <= 0 || height <= 0 {
            return Err(RasterError::InvalidSize { width, height });
        }
        let surface = ImageSurface::create_for_data(data, FORMAT, width, height, stride)?;
        Ok(Self { surface })
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    pub(crate) fn stride(&self) -> i32 {
        self.surface.stride()
    }

    /// Underlying Cairo surface (used as a paint source for backdrops and exports).
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    /// Copies the raw RGB24 rows out of the surface.
    pub(crate) fn raw_data(&self) -> Result<Vec<u8>, RasterError> {
        let mut copy = Vec::new();
        self.surface.with_data(|data| copy.extend_from_slice(data))?;
        Ok(copy)
    }

    /// Returns the colour at `(x, y)`, or `None` when out of bounds or unreadable.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        let offset = (y * self.stride() + x * 4) as usize;
        let mut pixel = None;
        self.surface
            .with_data(|data| {
                pixel = data
                    .get(offset..offset + 4)
                    .map(|bytes| Color::from_pixel(read_word(bytes)));
            })
            .ok()?;
        pixel
    }

    /// Tightly packed `R, G, B` bytes, row-major (the form image encoders expect).
    pub fn to_rgb_bytes(&self) -> Result<Vec<u8>, RasterError> {
        let (width, height, stride) = (
            self.width() as usize,
            self.height() as usize,
            self.stride() as usize,
        );
        let mut rgb = Vec::with_capacity(width * height * 3);
        self.surface.with_data(|data| {
            for row in data.chunks(stride).take(height) {
                for bytes in row[..width * 4].chunks_exact(4) {
                    let color = Color::from_pixel(read_word(bytes));
                    rgb.extend_from_slice(&[color.r, color.g, color.b]);
                }
            }
        })?;
        Ok(rgb)
    }

    /// Full independent copy of this raster.
    pub fn try_clone(&self) -> Result<Self, RasterError> {
        Self::from_raw(self.width(), self.height(), self.stride(), self.raw_data()?)
    }

    /// Copies the pixels under `rect` (clamped to the raster) into a patch.
    pub fn crop(&self, rect: Rect) -> Result<Option<RasterPatch>, RasterError> {
        let Some(rect) = rect.clamp_to_bounds(self.width(), self.height()) else {
            return Ok(None);
        };
        let patch_stride = FORMAT.stride_for_width(rect.width as u32)? as usize;
        let src_stride = self.stride() as usize;
        let row_bytes = rect.width as usize * 4;
        let mut bytes = vec![0u8; patch_stride * rect.height as usize];

        self.surface.with_data(|data| {
            for row in 0..rect.height as usize {
                let src = (rect.y as usize + row) * src_stride + rect.x as usize * 4;
                let dst = row * patch_stride;
                bytes[dst..dst + row_bytes].copy_from_slice(&data[src..src + row_bytes]);
            }
        })?;

        Ok(Some(RasterPatch {
            rect,
            stride: patch_stride as i32,
            bytes,
        }))
    }

    /// Encodes the raster as PNG into `writer`.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), RasterError> {
        self.surface.write_to_png(writer)?;
        Ok(())
    }

    /// Returns true when both rasters hold identical RGB content.
    pub fn same_pixels(&self, other: &RasterImage) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && matches!(
                (self.to_rgb_bytes(), other.to_rgb_bytes()),
                (Ok(a), Ok(b)) if a == b
            )
    }
}

fn read_word(bytes: &[u8]) -> u32 {
    u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// A rectangular copy of raster pixels in Cairo RGB24 layout.
#[derive(Debug, Clone)]
pub struct RasterPatch {
    rect: Rect,
    stride: i32,
    bytes: Vec<u8>,
}

impl RasterPatch {
    /// Area of the raster this patch was taken from.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    fn to_surface(&self) -> Result<ImageSurface, RasterError> {
        Ok(ImageSurface::create_for_data(
            self.bytes.clone(),
            FORMAT,
            self.rect.width,
            self.rect.height,
            self.stride,
        )?)
    }
}

/// Drawing handle bound to exactly one [`RasterImage`].
///
/// Raster rendering is aliased so committed pixels are exact and comparable.
#[derive(Debug)]
pub struct RasterPen {
    ctx: cairo::Context,
}

impl RasterPen {
    /// Binds a new drawing handle to `raster`.
    pub fn bind(raster: &RasterImage) -> Result<Self, RasterError> {
        let ctx = cairo::Context::new(raster.surface())?;
        ctx.set_antialias(cairo::Antialias::None);
        Ok(Self { ctx })
    }

    /// Cairo context targeting the bound raster.
    pub fn context(&self) -> &cairo::Context {
        &self.ctx
    }

    /// Copies `patch` back onto the raster at its original position.
    pub fn blit(&self, patch: &RasterPatch) -> Result<(), RasterError> {
        let source = patch.to_surface()?;
        let rect = patch.rect();
        self.ctx.save()?;
        self.ctx.identity_matrix();
        self.ctx.set_operator(cairo::Operator::Source);
        self.ctx
            .set_source_surface(&source, rect.x as f64, rect.y as f64)?;
        self.ctx.rectangle(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
        let filled = self.ctx.fill();
        self.ctx.restore()?;
        filled?;
        self.ctx.target().flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, RED, WHITE};

    #[test]
    fn new_raster_is_filled_with_background() {
        let raster = RasterImage::new(8, 4, WHITE).unwrap();
        assert_eq!(raster.width(), 8);
        assert_eq!(raster.height(), 4);
        assert_eq!(raster.pixel(0, 0), Some(WHITE));
        assert_eq!(raster.pixel(7, 3), Some(WHITE));
        assert_eq!(raster.pixel(8, 0), None);
        assert_eq!(raster.pixel(-1, 0), None);
    }

    #[test]
    fn zero_sized_raster_is_rejected() {
        assert!(matches!(
            RasterImage::new(0, 10, BLACK),
            Err(RasterError::InvalidSize { .. })
        ));
    }

    #[test]
    fn pen_writes_are_visible_through_pixel_reads() {
        let raster = RasterImage::new(10, 10, BLACK).unwrap();
        let pen = RasterPen::bind(&raster).unwrap();
        let ctx = pen.context();
        ctx.set_source_rgb(1.0, 0.0, 0.0);
        ctx.rectangle(2.0, 2.0, 3.0, 3.0);
        ctx.fill().unwrap();

        assert_eq!(raster.pixel(2, 2), Some(RED));
        assert_eq!(raster.pixel(4, 4), Some(RED));
        assert_eq!(raster.pixel(5, 5), Some(BLACK));
    }

    #[test]
    fn crop_and_blit_restore_pixels() {
        let raster = RasterImage::new(10, 10, BLACK).unwrap();
        let pen = RasterPen::bind(&raster).unwrap();
        let before = raster.crop(Rect::new(1, 1, 5, 5).unwrap()).unwrap().unwrap();

        pen.context().set_source_rgb(1.0, 1.0, 1.0);
        pen.context().paint().unwrap();
        assert_eq!(raster.pixel(3, 3), Some(WHITE));

        pen.blit(&before).unwrap();
        assert_eq!(raster.pixel(3, 3), Some(BLACK));
        assert_eq!(raster.pixel(0, 0), Some(WHITE));
        assert_eq!(raster.pixel(6, 6), Some(WHITE));
    }

    #[test]
    fn crop_outside_raster_is_empty() {
        let raster = RasterImage::new(4, 4, BLACK).unwrap();
        assert!(raster.crop(Rect::new(10, 10, 2, 2).unwrap()).unwrap().is_none());
    }

    #[test]
    fn clone_is_independent() {
        let raster = RasterImage::new(4, 4, BLACK).unwrap();
        let copy = raster.try_clone().unwrap();
        let pen = RasterPen::bind(&raster).unwrap();
        pen.context().set_source_rgb(1.0, 1.0, 1.0);
        pen.context().paint().unwrap();

        assert_eq!(copy.pixel(1, 1), Some(BLACK));
        assert!(!copy.same_pixels(&raster));
        assert_eq!(raster.to_rgb_bytes().unwrap().len(), 4 * 4 * 3);
    }

    #[test]
    fn png_encoding_produces_signature() {
        let raster = RasterImage::new(3, 3, RED).unwrap();
        let mut bytes = Vec::new();
        raster.write_png(&mut bytes).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
