//! Collaborator interface for user prompts.
//!
//! The board never builds dialogs itself; a front end supplies them through
//! [`Dialogs`]. Returning `None`/`false` means the user dismissed the prompt,
//! which every caller treats as a silent no-op.

use crate::draw::Color;
use std::collections::VecDeque;
use std::path::PathBuf;

/// Prompts the board may need during an operation.
pub trait Dialogs {
    /// Asks for a pen colour.
    fn pick_color(&mut self) -> Option<Color>;

    /// Asks for text to stamp.
    fn prompt_text(&mut self) -> Option<String>;

    /// Asks where to save a file with the given extension (without dot).
    fn choose_save_path(&mut self, extension: &str) -> Option<PathBuf>;

    /// Asks a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Dialog answers queued up front, for scripts and tests.
///
/// Each prompt pops the next queued answer; an empty queue behaves like a
/// dismissed dialog.
#[derive(Debug, Default, Clone)]
pub struct ScriptedDialogs {
    pub colors: VecDeque<Color>,
    pub texts: VecDeque<String>,
    pub save_paths: VecDeque<PathBuf>,
    pub confirmations: VecDeque<bool>,
    /// Messages passed to [`Dialogs::confirm`], oldest first
    pub asked: Vec<String>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.colors.push_back(color);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.texts.push_back(text.into());
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_paths.push_back(path.into());
        self
    }

    pub fn with_confirmation(mut self, answer: bool) -> Self {
        self.confirmations.push_back(answer);
        self
    }
}

impl Dialogs for ScriptedDialogs {
    fn pick_color(&mut self) -> Option<Color> {
        self.colors.pop_front()
    }

    fn prompt_text(&mut self) -> Option<String> {
        self.texts.pop_front()
    }

    fn choose_save_path(&mut self, _extension: &str) -> Option<PathBuf> {
        self.save_paths.pop_front()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.confirmations.pop_front().unwrap_or(false)
    }
}
