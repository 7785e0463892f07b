//! Font descriptor for text stamping.

use pango::prelude::*;

/// Family used whenever the configured one is not installed.
pub const FALLBACK_FAMILY: &str = "Sans";

/// Font configuration for text rendering.
///
/// The same descriptor is used for the overlay text primitive and the raster
/// stamp so both buffers pick the same face.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Monospace", "DejaVu Serif")
    pub family: String,

    /// Font weight (e.g., "normal", "bold")
    pub weight: String,
}

impl FontDescriptor {
    /// Creates a new font descriptor with the specified parameters.
    pub fn new(family: String, weight: String) -> Self {
        Self { family, weight }
    }

    /// Converts this font descriptor to a Pango font description string.
    ///
    /// Format: "Family Weight Size", e.g. "Sans 24" or "Monospace Bold 12".
    pub fn to_pango_string(&self, size: f64) -> String {
        let mut parts = vec![self.family.clone()];

        if !self.weight.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.weight));
        }

        parts.push(format!("{}", size.round() as i32));

        parts.join(" ")
    }

    /// Returns a descriptor whose family is known to the font map.
    ///
    /// Falls back to [`FALLBACK_FAMILY`] when the configured family cannot be found
    /// or the font map cannot be queried.
    pub fn resolve(&self) -> Self {
        if self.family.eq_ignore_ascii_case(FALLBACK_FAMILY) || family_installed(&self.family) {
            return self.clone();
        }

        log::warn!(
            "Font family '{}' not available, falling back to '{}'",
            self.family,
            FALLBACK_FAMILY
        );
        Self {
            family: FALLBACK_FAMILY.to_string(),
            weight: self.weight.clone(),
        }
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: FALLBACK_FAMILY.to_string(),
            weight: "normal".to_string(),
        }
    }
}

fn family_installed(family: &str) -> bool {
    let Ok(surface) = cairo::ImageSurface::create(cairo::Format::Rgb24, 1, 1) else {
        return false;
    };
    let Ok(ctx) = cairo::Context::new(&surface) else {
        return false;
    };
    let pango_ctx = pangocairo::functions::create_context(&ctx);
    pango_ctx
        .list_families()
        .iter()
        .any(|candidate| candidate.name().eq_ignore_ascii_case(family))
}

/// Capitalizes the first letter of a string.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pango_string_default() {
        let font = FontDescriptor::default();
        assert_eq!(font.to_pango_string(24.0), "Sans 24");
    }

    #[test]
    fn pango_string_with_weight() {
        let font = FontDescriptor::new("Monospace".to_string(), "bold".to_string());
        assert_eq!(font.to_pango_string(12.4), "Monospace Bold 12");
    }

    #[test]
    fn unknown_family_falls_back_to_sans() {
        let font = FontDescriptor::new(
            "No Such Family 1f3a9c".to_string(),
            "normal".to_string(),
        );
        assert_eq!(font.resolve().family, FALLBACK_FAMILY);
    }

    #[test]
    fn fallback_family_is_kept() {
        let font = FontDescriptor::default();
        assert_eq!(font.resolve(), font);
    }
}
