use ratatui::text::{Line, Span};

use crate::core::types::{Message, Role};
use crate::ui::markdown::MarkdownWidget;
use crate::ui::theme::{Glyphs, Theme};

/// Lines for one transcript entry. `streaming` marks the entry currently
/// being written by the model; it gets a trailing cursor.
pub fn render_message(message: &Message, width: u16, streaming: bool) -> Vec<Line<'static>> {
    match message.role {
        Role::User => render_user(&message.text, width),
        Role::Assistant => render_assistant(&message.text, width, streaming),
    }
}

fn render_user(text: &str, width: u16) -> Vec<Line<'static>> {
    let indent = Glyphs::USER_MARK.len();
    let available_width = (width as usize).saturating_sub(indent + 1).max(1);

    textwrap::wrap(text, available_width)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let lead = if i == 0 {
                Span::styled(Glyphs::USER_MARK, Theme::primary_bold())
            } else {
                Span::raw(" ".repeat(indent))
            };
            Line::from(vec![lead, Span::styled(line.into_owned(), Theme::user())])
        })
        .collect()
}

fn render_assistant(text: &str, width: u16, streaming: bool) -> Vec<Line<'static>> {
    let content_width = (width as usize).saturating_sub(Glyphs::ASSISTANT_MARK.len());
    let rendered = MarkdownWidget::new(text)
        .width(content_width)
        .render_to_lines()
        .unwrap_or_else(|_| plaintext_fallback(text, content_width));

    let mut lines = add_prefix_to_lines(trim_trailing_empty_lines(rendered));

    if streaming {
        append_cursor(&mut lines);
    }

    lines
}

fn plaintext_fallback(text: &str, width: usize) -> Vec<Line<'static>> {
    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|line| Line::from(line.into_owned()))
        .collect()
}

fn trim_trailing_empty_lines(mut lines: Vec<Line<'static>>) -> Vec<Line<'static>> {
    while lines
        .last()
        .is_some_and(|l| l.spans.iter().all(|s| s.content.trim().is_empty()))
    {
        lines.pop();
    }
    lines
}

fn add_prefix_to_lines(lines: Vec<Line<'static>>) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let lead = if i == 0 {
                Span::styled(Glyphs::ASSISTANT_MARK, Theme::primary())
            } else {
                Span::raw("  ")
            };
            let mut spans = Vec::with_capacity(line.spans.len() + 1);
            spans.push(lead);
            spans.extend(line.spans);
            Line::from(spans).style(Theme::assistant())
        })
        .collect()
}

fn append_cursor(lines: &mut Vec<Line<'static>>) {
    let cursor = Span::styled(Glyphs::CURSOR, Theme::primary());

    match lines.last_mut() {
        Some(last_line) => last_line.spans.push(cursor),
        None => lines.push(Line::from(vec![
            Span::styled(Glyphs::ASSISTANT_MARK, Theme::primary()),
            cursor,
        ])),
    }
}
