use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{InputAction, InputWidget, PASTE_PLACEHOLDER_THRESHOLD, PastedBlock};

impl InputWidget<'_> {
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::SHIFT | KeyModifiers::ALT) => {
                self.textarea.insert_newline();
                InputAction::Continue
            }
            (KeyCode::Enter, KeyModifiers::NONE) => self.handle_enter(),

            (KeyCode::Char('k' | 'u'), KeyModifiers::CONTROL) => {
                self.clear();
                InputAction::Clear
            }

            _ => {
                self.textarea.input(key);
                InputAction::Continue
            }
        }
    }

    pub fn handle_paste(&mut self, text: String) -> InputAction {
        if text.len() <= PASTE_PLACEHOLDER_THRESHOLD {
            self.insert_text_direct(&text);
        } else {
            self.insert_paste_placeholder(text);
        }

        InputAction::Continue
    }

    fn handle_enter(&mut self) -> InputAction {
        if self.disabled || self.text().trim().is_empty() {
            InputAction::Continue
        } else {
            InputAction::Submit(self.take())
        }
    }

    fn insert_text_direct(&mut self, text: &str) {
        for (i, line) in text.lines().enumerate() {
            if i > 0 {
                self.textarea.insert_newline();
            }
            for ch in line.chars() {
                self.textarea.insert_char(ch);
            }
        }

        if text.ends_with('\n') {
            self.textarea.insert_newline();
        }
    }

    fn insert_paste_placeholder(&mut self, content: String) {
        let paste_id = self.next_paste_id;
        self.next_paste_id += 1;

        let placeholder = Self::make_placeholder(paste_id, content.len());

        self.pasted_blocks.push(PastedBlock {
            content,
            placeholder_id: paste_id,
        });

        for ch in placeholder.chars() {
            self.textarea.insert_char(ch);
        }
    }
}
