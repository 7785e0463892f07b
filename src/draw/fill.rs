//! Threshold-based flood fill over a raster buffer.

use super::color::Color;
use super::raster::{RasterError, RasterImage};
use thiserror::Error;

/// Errors raised by [`flood_fill`]. Callers report these as status text.
#[derive(Debug, Error)]
pub enum FillError {
    #[error("seed ({x}, {y}) outside {width}x{height} raster")]
    SeedOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Fills the region connected to `seed` with `fill` and returns the result as a new raster.
///
/// A pixel belongs to the region when its Manhattan RGB distance to the seed
/// colour is at most `threshold`. Connectivity is 4-way. The source raster is
/// left untouched.
pub fn flood_fill(
    raster: &RasterImage,
    seed: (i32, i32),
    fill: Color,
    threshold: u32,
) -> Result<RasterImage, FillError> {
    let (width, height) = (raster.width(), raster.height());
    let (sx, sy) = seed;
    if sx < 0 || sy < 0 || sx >= width || sy >= height {
        return Err(FillError::SeedOutOfBounds {
            x: sx,
            y: sy,
            width,
            height,
        });
    }

    let stride = raster.stride();
    let mut data = raster.raw_data()?;
    let (wu, hu, words_per_row) = (width as usize, height as usize, stride as usize / 4);

    let word = |data: &[u8], x: usize, y: usize| {
        let o = y * words_per_row * 4 + x * 4;
        Color::from_pixel(u32::from_ne_bytes([
            data[o],
            data[o + 1],
            data[o + 2],
            data[o + 3],
        ]))
    };

    let target = word(&data, sx as usize, sy as usize);
    let fill_bytes = fill.to_pixel().to_ne_bytes();

    // visited mask, one byte per pixel
    let mut visited = vec![false; wu * hu];
    let mut stack: Vec<(usize, usize)> = Vec::with_capacity(4096);
    visited[sy as usize * wu + sx as usize] = true;
    stack.push((sx as usize, sy as usize));
    let mut filled = 0usize;

    while let Some((x, y)) = stack.pop() {
        let o = y * words_per_row * 4 + x * 4;
        data[o..o + 4].copy_from_slice(&fill_bytes);
        filled += 1;

        let neighbors = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbors {
            if nx >= wu || ny >= hu {
                continue;
            }
            let vi = ny * wu + nx;
            if visited[vi] {
                continue;
            }
            visited[vi] = true;
            if word(&data, nx, ny).distance(&target) <= threshold {
                stack.push((nx, ny));
            }
        }
    }

    log::debug!(
        "Flood fill from ({sx}, {sy}) recoloured {filled} pixels to {}",
        fill.to_hex()
    );
    Ok(RasterImage::from_raw(width, height, stride, data)?)
}
