//! Configuration enum types.

use crate::draw::Color;
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - a name, a hex string, or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// default_color = "red"
///
/// # Hex color
/// default_color = "#ff8000"
///
/// # Custom RGB color (0-255 per component)
/// default_color = [255, 128, 0]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (red, green, blue, yellow, orange, pink, white, black, gray)
    /// or `#rgb` / `#rrggbb`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Resolves the colour, or `None` for an unknown name or malformed hex.
    pub fn parse(&self) -> Option<Color> {
        match self {
            ColorSpec::Name(name) => crate::util::name_to_color(name),
            ColorSpec::Rgb([r, g, b]) => Some(Color::new(*r, *g, *b)),
        }
    }

    /// Converts to a [`Color`], falling back with a warning when unresolvable.
    pub fn to_color(&self, fallback: Color) -> Color {
        self.parse().unwrap_or_else(|| {
            warn!("Unknown color {:?}, using {}", self, fallback.to_hex());
            fallback
        })
    }
}

impl From<&str> for ColorSpec {
    fn from(value: &str) -> Self {
        ColorSpec::Name(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLACK, ORANGE, RED};

    #[test]
    fn names_hex_and_arrays_resolve() {
        assert_eq!(ColorSpec::from("red").parse(), Some(RED));
        assert_eq!(ColorSpec::from("#ff8000").parse(), Some(ORANGE));
        assert_eq!(ColorSpec::Rgb([255, 128, 0]).parse(), Some(ORANGE));
    }

    #[test]
    fn unknown_name_falls_back() {
        assert_eq!(ColorSpec::from("chartreuse").to_color(BLACK), BLACK);
        assert_eq!(ColorSpec::from("#12").to_color(RED), RED);
    }
}
