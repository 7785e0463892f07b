//! Replayable board scripts for headless runs.
//!
//! A script is a TOML document listing pointer events and board actions in
//! order, plus the answers to give when an action opens a dialog.
//!
//! ```toml
//! [display]
//! width = 800
//! height = 600
//!
//! [dialogs]
//! texts = ["Hello"]
//! confirmations = [true]
//!
//! [[step]]
//! action = "tool"
//! tool = "rectangle"
//!
//! [[step]]
//! action = "down"
//! x = 20
//! y = 20
//!
//! [[step]]
//! action = "up"
//! x = 80
//! y = 60
//! ```

use crate::config::ColorSpec;
use crate::dialogs::ScriptedDialogs;
use crate::draw::Color;
use crate::input::{BoardSettings, InputState, MouseButton, ToolKind};
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Display size the board is composed for, when it differs from the page.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplaySize {
    pub width: i32,
    pub height: i32,
}

/// Answers handed out to dialogs, oldest first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DialogAnswers {
    #[serde(default)]
    pub colors: Vec<ColorSpec>,
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default)]
    pub confirmations: Vec<bool>,
}

/// One scripted event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
    },
    Tool {
        tool: String,
    },
    Color {
        color: ColorSpec,
    },
    PickColor,
    Size {
        size: u32,
    },
    Opacity {
        opacity: f64,
    },
    FillShapes,
    Background {
        color: ColorSpec,
    },
    Undo,
    Redo,
    Clear,
    Grid,
    AddPage,
    NextPage,
    PrevPage,
    Resize {
        width: i32,
        height: i32,
    },
}

/// A parsed script.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub display: Option<DisplaySize>,
    #[serde(default)]
    pub dialogs: DialogAnswers,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the script at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }

    /// Overrides the display size in `settings` when the script sets one.
    pub fn apply_display(&self, settings: &mut BoardSettings) {
        if let Some(display) = self.display {
            settings.display_width = display.width;
            settings.display_height = display.height;
        }
    }

    /// Builds the dialog stand-in that answers this script's prompts.
    pub fn dialogs(&self) -> Result<ScriptedDialogs> {
        let mut dialogs = ScriptedDialogs::new();
        for spec in &self.dialogs.colors {
            dialogs = dialogs.with_color(resolve_color(spec)?);
        }
        for text in &self.dialogs.texts {
            dialogs = dialogs.with_text(text.clone());
        }
        for answer in &self.dialogs.confirmations {
            dialogs = dialogs.with_confirmation(*answer);
        }
        Ok(dialogs)
    }

    /// Replays every step against `state`, stopping at the first invalid one.
    pub fn run(&self, state: &mut InputState, dialogs: &mut ScriptedDialogs) -> Result<()> {
        log::info!("Replaying {} script steps", self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            log::debug!("Step {}: {:?}", index + 1, step);
            apply_step(state, step, dialogs)
                .with_context(|| format!("Script step {} failed", index + 1))?;
        }
        Ok(())
    }
}

fn apply_step(state: &mut InputState, step: &Step, dialogs: &mut ScriptedDialogs) -> Result<()> {
    match step {
        Step::Down { x, y, button } => state.on_mouse_press(*button, *x, *y, dialogs),
        Step::Move { x, y } => state.on_mouse_motion(*x, *y),
        Step::Up { x, y, button } => state.on_mouse_release(*button, *x, *y),
        Step::Tool { tool } => state.set_tool(tool.parse::<ToolKind>()?),
        Step::Color { color } => state.set_color(resolve_color(color)?),
        Step::PickColor => state.pick_color(dialogs),
        Step::Size { size } => state.set_size(*size),
        Step::Opacity { opacity } => state.set_opacity(*opacity),
        Step::FillShapes => {
            state.toggle_fill_shapes();
        }
        Step::Background { color } => state.set_background(resolve_color(color)?),
        Step::Undo => state.undo(),
        Step::Redo => state.redo(),
        Step::Clear => state.clear_board(dialogs),
        Step::Grid => {
            state.toggle_grid();
        }
        Step::AddPage => state.add_page(),
        Step::NextPage => state.next_page(),
        Step::PrevPage => state.prev_page(),
        Step::Resize { width, height } => state.resize_display(*width, *height),
    }
    Ok(())
}

fn resolve_color(spec: &ColorSpec) -> Result<Color> {
    spec.parse()
        .ok_or_else(|| anyhow!("Unknown color {spec:?}"))
}
