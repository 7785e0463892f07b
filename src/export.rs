//! Raster export to PNG and JPEG files.

use crate::draw::{RasterError, RasterImage};
use chrono::Local;
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while exporting a page.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),

    #[error("JPEG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Image file format for page exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossless
    Png,
    /// Lossy, written from plain RGB
    Jpeg,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    /// Picks the format from a path's extension; anything unrecognised is PNG.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => ExportFormat::Jpeg,
            _ => ExportFormat::Png,
        }
    }
}

/// Where and how exports are written when no explicit path is given.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Directory for generated file names.
    pub directory: PathBuf,
    /// File name template (supports chrono format specifiers).
    pub filename_template: String,
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("Slateboard"),
            filename_template: "board_%Y%m%d_%H%M%S".to_string(),
            jpeg_quality: 95,
        }
    }
}

/// Generate a file name from `template` and the current local time.
///
/// # Arguments
/// * `template` - Template string with chrono format specifiers
/// * `extension` - File extension without the dot (e.g., "png")
pub fn default_file_name(template: &str, extension: &str) -> String {
    let now = Local::now();
    format!("{}.{}", now.format(template), extension)
}

/// Ensure the export directory exists, creating it if necessary.
///
/// Returns the canonicalized path when it can be resolved.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Writes `raster` to `path` at full resolution.
///
/// Missing parent directories are created. `jpeg_quality` is ignored for PNG.
pub fn save_raster(
    raster: &RasterImage,
    path: &Path,
    format: ExportFormat,
    jpeg_quality: u8,
) -> Result<PathBuf, ExportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_directory_exists(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Png => raster.write_png(&mut writer)?,
        ExportFormat::Jpeg => {
            let rgb = raster.to_rgb_bytes()?;
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, jpeg_quality.clamp(1, 100));
            encoder.encode(
                &rgb,
                raster.width() as u32,
                raster.height() as u32,
                ExtendedColorType::Rgb8,
            )?;
        }
    }
    writer.flush()?;

    let written = fs::metadata(path)?.len();
    log::info!(
        "Exported {}x{} page to {} ({} bytes)",
        raster.width(),
        raster.height(),
        path.display(),
        written
    );
    Ok(path.to_path_buf())
}

/// Writes `raster` into the configured directory under a generated file name.
pub fn save_to_directory(
    raster: &RasterImage,
    settings: &ExportSettings,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&settings.directory)?;
    let file_name = default_file_name(&settings.filename_template, format.extension());
    save_raster(raster, &directory.join(file_name), format, settings.jpeg_quality)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLUE, WHITE};

    #[test]
    fn default_file_name_uses_template_and_extension() {
        let name = default_file_name("board_%Y%m%d", "png");
        assert!(name.starts_with("board_"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), "board_".len() + 8 + ".png".len());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a.JPG")), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_path(Path::new("a.jpeg")), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_path(Path::new("a.png")), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("a")), ExportFormat::Png);
    }

    #[test]
    fn png_export_writes_signature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("page.png");
        let raster = RasterImage::new(16, 8, BLUE).unwrap();

        let saved = save_raster(&raster, &path, ExportFormat::Png, 95).unwrap();
        let bytes = fs::read(saved).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn jpeg_export_decodes_to_same_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.jpg");
        let raster = RasterImage::new(20, 10, WHITE).unwrap();

        save_raster(&raster, &path, ExportFormat::Jpeg, 95).unwrap();
        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (20, 10));
        assert!(decoded.get_pixel(5, 5).0.iter().all(|c| *c > 240));
    }

    #[test]
    fn save_to_directory_generates_name() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings {
            directory: dir.path().join("out"),
            filename_template: "page_%H".to_string(),
            jpeg_quality: 80,
        };
        let raster = RasterImage::new(4, 4, WHITE).unwrap();
        let saved = save_to_directory(&raster, &settings, ExportFormat::Png).unwrap();
        let name = saved.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("page_") && name.ends_with(".png"));
        assert!(saved.exists());
    }

    #[test]
    fn expand_tilde_resolves_home() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn default_settings_point_at_slateboard_directory() {
        let settings = ExportSettings::default();
        assert_eq!(settings.jpeg_quality, 95);
        assert!(settings.directory.to_string_lossy().contains("Slateboard"));
    }
}
