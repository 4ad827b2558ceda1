#![allow(clippy::cast_possible_truncation)]

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use super::InputWidget;
use crate::ui::theme::{Glyphs, Theme};

const HINT_WIDTH: u16 = 8;

impl InputWidget<'_> {
    pub fn render(&mut self, area: Rect, frame: &mut Frame) {
        self.render_separator(area, frame.buffer_mut());

        let input_area = self.input_area(area);
        self.render_prefix(input_area, frame.buffer_mut());
        self.render_hint_if_needed(input_area, frame.buffer_mut());

        let textarea_area = self.textarea_area(input_area);
        self.render_textarea(textarea_area, frame);
    }

    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        let separator_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        };

        let line = Line::from(Span::styled(
            Glyphs::HORIZONTAL.repeat(area.width as usize),
            Theme::border(),
        ));
        Paragraph::new(line).render(separator_area, buf);
    }

    fn render_prefix(&self, input_area: Rect, buf: &mut Buffer) {
        let prefix_area = Rect {
            x: input_area.x,
            y: input_area.y,
            width: 2,
            height: 1,
        };

        let style = if self.disabled {
            Theme::muted()
        } else {
            Theme::primary_bold()
        };
        Paragraph::new(Line::from(Span::styled(Glyphs::USER_MARK, style))).render(prefix_area, buf);
    }

    fn render_hint_if_needed(&self, input_area: Rect, buf: &mut Buffer) {
        if self.is_empty() || self.disabled || input_area.width <= HINT_WIDTH {
            return;
        }

        const HINT_TEXT: &str = "↵ send";

        let hint_area = Rect {
            x: input_area.x + input_area.width - HINT_WIDTH + 1,
            y: input_area.y,
            width: HINT_WIDTH - 1,
            height: 1,
        };

        let hint = Line::from(Span::styled(HINT_TEXT, Theme::muted()));
        Paragraph::new(hint).render(hint_area, buf);
    }

    fn render_textarea(&mut self, area: Rect, frame: &mut Frame) {
        self.textarea
            .set_block(Block::default().borders(Borders::NONE));
        self.textarea.set_style(if self.disabled {
            Theme::muted()
        } else {
            Theme::user()
        });

        frame.render_widget(&self.textarea, area);

        if !self.disabled {
            let (cursor_row, cursor_col) = self.textarea.cursor();
            frame.set_cursor_position(Position::new(
                area.x + cursor_col as u16,
                area.y + cursor_row as u16,
            ));
        }
    }

    fn input_area(&self, area: Rect) -> Rect {
        Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(1),
        }
    }

    fn textarea_area(&self, input_area: Rect) -> Rect {
        Rect {
            x: input_area.x + 2,
            y: input_area.y,
            width: input_area.width.saturating_sub(2 + HINT_WIDTH),
            height: input_area.height,
        }
    }
}
