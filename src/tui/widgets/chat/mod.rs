#![allow(clippy::cast_possible_truncation)]
mod render;
mod scroll_state;

pub use render::render_message;
pub use scroll_state::ScrollState;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::core::types::{Message, MessageId};
use crate::ui::theme::Theme;

pub struct ChatWidget<'a> {
    messages: &'a [Message],
    scroll: &'a mut ScrollState,
    streaming: Option<MessageId>,
}

impl<'a> ChatWidget<'a> {
    #[must_use]
    pub const fn new(messages: &'a [Message], scroll: &'a mut ScrollState) -> Self {
        Self {
            messages,
            scroll,
            streaming: None,
        }
    }

    /// The entry that receives the cursor while a reply is in flight.
    #[must_use]
    pub const fn streaming(mut self, target: Option<MessageId>) -> Self {
        self.streaming = target;
        self
    }

    pub fn render(self, area: Rect, buf: &mut Buffer) {
        if self.messages.is_empty() {
            Self::render_empty_state(area, buf);
            return;
        }

        let content_width = area.width.saturating_sub(4);
        let all_lines = self.collect_all_lines(content_width);

        self.update_scroll_and_render(area, buf, &all_lines, content_width);
    }

    fn collect_all_lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for (idx, message) in self.messages.iter().enumerate() {
            let streaming = self.streaming == Some(message.id);
            lines.extend(render_message(message, width, streaming));

            if idx + 1 < self.messages.len() {
                lines.push(Line::default());
            }
        }

        lines
    }

    fn update_scroll_and_render(
        self,
        area: Rect,
        buf: &mut Buffer,
        lines: &[Line<'static>],
        content_width: u16,
    ) {
        let total_lines = lines.len();
        let viewport_height = area.height as usize;

        self.scroll.update(total_lines, viewport_height);

        let offset = self.scroll.position().min(total_lines);
        let end = (offset + viewport_height).min(total_lines);

        for (i, line) in lines[offset..end].iter().enumerate() {
            buf.set_line(area.x + 2, area.y + i as u16, line, content_width);
        }

        if !self.scroll.is_at_bottom() {
            Self::render_scroll_indicator(area, buf);
        }
    }

    fn render_empty_state(area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::default(),
            Line::from(Span::styled("Nothing here yet.", Theme::primary_bold()))
                .alignment(Alignment::Center),
            Line::default(),
            Line::from(Span::styled(
                "Type a message below and press Enter to send it.",
                Theme::muted(),
            ))
            .alignment(Alignment::Center),
        ];

        Paragraph::new(lines).render(area, buf);
    }

    fn render_scroll_indicator(area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height == 0 {
            return;
        }
        let indicator_area = Rect {
            x: area.x + area.width - 10,
            y: area.y + area.height - 1,
            width: 10,
            height: 1,
        };

        let indicator = Line::from(Span::styled("↓ More", Theme::warning()));
        Paragraph::new(indicator).render(indicator_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Role;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_renders_transcript() {
        let messages = vec![
            Message::new(MessageId::new(1), Role::Assistant, "Hello there"),
            Message::new(MessageId::new(2), Role::User, "Hi"),
        ];
        let mut scroll = ScrollState::new();
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);

        ChatWidget::new(&messages, &mut scroll).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Hello there"));
        assert!(text.contains("> Hi"));
    }

    #[test]
    fn test_long_transcript_starts_at_bottom() {
        let messages: Vec<Message> = (0..20)
            .map(|i| Message::new(MessageId::new(i), Role::User, format!("line {i}")))
            .collect();
        let mut scroll = ScrollState::new();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);

        ChatWidget::new(&messages, &mut scroll).render(area, &mut buf);

        assert!(scroll.is_at_bottom());
        assert!(buffer_text(&buf).contains("line 19"));
    }

    #[test]
    fn test_empty_state() {
        let mut scroll = ScrollState::new();
        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);

        ChatWidget::new(&[], &mut scroll).render(area, &mut buf);

        assert!(buffer_text(&buf).contains("Nothing here yet."));
    }
}
