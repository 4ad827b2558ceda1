mod action;
mod key_handler;
mod render;

pub use action::InputAction;

use crate::ui::theme::Theme;
use ratatui::style::Style;
use tui_textarea::TextArea;

const PASTE_PLACEHOLDER_THRESHOLD: usize = 200;

/// Pastes longer than the threshold show as a short placeholder in the box and
/// are expanded again when the text is taken.
#[derive(Debug, Clone)]
struct PastedBlock {
    content: String,
    placeholder_id: usize,
}

pub struct InputWidget<'a> {
    textarea: TextArea<'a>,
    pasted_blocks: Vec<PastedBlock>,
    next_paste_id: usize,
    disabled: bool,
}

impl InputWidget<'_> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            textarea: Self::create_textarea(),
            pasted_blocks: Vec::new(),
            next_paste_id: 0,
            disabled: false,
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        let mut result = self.textarea.lines().join("\n");

        for block in &self.pasted_blocks {
            let placeholder = Self::make_placeholder(block.placeholder_id, block.content.len());
            result = result.replace(&placeholder, &block.content);
        }

        result
    }

    pub fn clear(&mut self) {
        self.textarea = Self::create_textarea();
        self.pasted_blocks.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(String::is_empty)
    }

    /// Rows the box needs for its current text.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.textarea.lines().len().max(1)
    }

    pub fn take(&mut self) -> String {
        let text = self.text();
        self.clear();
        text
    }

    /// While disabled the box keeps its text but ignores Enter.
    pub const fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn create_textarea() -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("");
        textarea.set_cursor_line_style(Style::default());
        textarea.set_cursor_style(Theme::user());
        textarea
    }

    fn make_placeholder(id: usize, char_count: usize) -> String {
        format!("[paste#{id}:{char_count}]")
    }
}

impl Default for InputWidget<'_> {
    fn default() -> Self {
        Self::new()
    }
}
