use crate::input::InputState;
use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Snapshot of UI state written by the session export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Number of pages on the board
    pub pages: usize,
    /// Zero-based index of the current page
    pub current_page: usize,
    /// Pen colour as `#rrggbb`
    pub pen_color: String,
    pub pen_size: u32,
    /// Tool identifier, e.g. `pen`
    pub tool: String,
    /// ISO-8601 local time of the export
    pub timestamp: String,
}

impl SessionMetadata {
    /// Captures the current board state.
    pub fn from_input(input: &InputState) -> Self {
        Self {
            pages: input.pages.len(),
            current_page: input.pages.current_index(),
            pen_color: input.tool.color.to_hex(),
            pen_size: input.tool.stroke_width,
            tool: input.tool.active_tool.as_str().to_string(),
            timestamp: Local::now().to_rfc3339(),
        }
    }
}

/// Writes `metadata` as pretty JSON, replacing `path` atomically.
pub fn save_metadata(path: &Path, metadata: &SessionMetadata) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_vec_pretty(metadata).context("failed to serialise session metadata")?;

    let tmp_path = temp_path(path);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| {
                format!(
                    "failed to open temporary session file {}",
                    tmp_path.display()
                )
            })?;
        tmp_file
            .write_all(&json)
            .context("failed to write session metadata")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary session file")?;
    }

    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "failed to move temporary session file {} -> {}",
            tmp_path.display(),
            path.display()
        )
    })?;

    info!(
        "Session metadata saved to {} ({} bytes)",
        path.display(),
        json.len()
    );
    Ok(())
}

/// Reads session metadata previously written by [`save_metadata`].
pub fn load_metadata(path: &Path) -> Result<SessionMetadata> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read session file {}", path.display()))?;
    serde_json::from_slice(&bytes).context("failed to parse session json")
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{}", counter));
    }
    candidate
}
