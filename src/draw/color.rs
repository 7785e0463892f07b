//! 8-bit RGB color type and predefined color constants.

use serde::{Deserialize, Serialize};

/// Represents an opaque RGB color with 8 bits per channel.
///
/// # Examples
///
/// ```
/// use slateboard::draw::Color;
/// let red = Color::new(255, 0, 0);
/// assert_eq!(red.to_hex(), "#ff0000");
/// assert_eq!(Color::from_hex("#f00"), Some(red));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
}

impl Color {
    /// Creates a new color from RGB components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            3 => {
                let mut channels = digits.chars().map(|c| {
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    v * 17
                });
                Some(Self::new(channels.next()?, channels.next()?, channels.next()?))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        }
    }

    /// Formats as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Components scaled to 0.0-1.0 for Cairo sources.
    pub fn to_cairo(&self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }

    /// Sum of absolute per-channel differences (0..=765).
    pub fn distance(&self, other: &Color) -> u32 {
        self.r.abs_diff(other.r) as u32
            + self.g.abs_diff(other.g) as u32
            + self.b.abs_diff(other.b) as u32
    }

    /// Packs into a Cairo RGB24 pixel (`0x00RRGGBB`).
    pub(crate) fn to_pixel(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpacks a Cairo RGB24 pixel, ignoring the unused high byte.
    pub(crate) fn from_pixel(pixel: u32) -> Self {
        Self::new(
            ((pixel >> 16) & 0xff) as u8,
            ((pixel >> 8) & 0xff) as u8,
            (pixel & 0xff) as u8,
        )
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

pub const RED: Color = Color::new(255, 0, 0);
pub const GREEN: Color = Color::new(0, 255, 0);
pub const BLUE: Color = Color::new(0, 0, 255);
pub const YELLOW: Color = Color::new(255, 255, 0);
pub const ORANGE: Color = Color::new(255, 128, 0);
pub const PINK: Color = Color::new(255, 0, 255);
pub const WHITE: Color = Color::new(255, 255, 255);
pub const BLACK: Color = Color::new(0, 0, 0);
pub const GRAY: Color = Color::new(128, 128, 128);

/// Laser glow ring colours, innermost first.
pub const LASER_GLOWS: [Color; 4] = [
    Color::new(0xff, 0x00, 0x00),
    Color::new(0xff, 0x44, 0x44),
    Color::new(0xff, 0x88, 0x88),
    Color::new(0xff, 0xcc, 0xcc),
];
