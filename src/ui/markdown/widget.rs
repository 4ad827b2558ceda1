#![allow(clippy::cast_possible_truncation)]
use markdown::{ParseOptions, to_mdast};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::theme::Theme;

use super::block::render_node;
use super::context::RenderContext;
use super::error::MarkdownError;

const DEFAULT_WIDTH: usize = 80;

/// Renders GitHub-flavoured markdown into styled terminal lines.
///
/// Partial documents (a reply still streaming in) parse fine; an unclosed
/// fence simply renders as a code block running to the end.
#[derive(Debug, Clone)]
pub struct MarkdownWidget {
    content: String,
    width: usize,
}

impl MarkdownWidget {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            width: DEFAULT_WIDTH,
        }
    }

    #[must_use]
    pub const fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn render_to_lines(&self) -> Result<Vec<Line<'static>>, MarkdownError> {
        let ast = to_mdast(&self.content, &ParseOptions::gfm())
            .map_err(|e| MarkdownError::Parse(e.to_string()))?;

        Ok(render_node(&ast, RenderContext::new(self.width)))
    }
}

impl Widget for MarkdownWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self
            .width(area.width as usize)
            .render_to_lines()
            .unwrap_or_else(|e| vec![Line::from(Span::styled(e.to_string(), Theme::error()))]);

        for (y_offset, line) in lines.iter().take(area.height as usize).enumerate() {
            buf.set_line(area.x, area.y + y_offset as u16, line, area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str, width: usize) -> Vec<String> {
        MarkdownWidget::new(source)
            .width(width)
            .render_to_lines()
            .unwrap()
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_heading_and_paragraph() {
        let lines = texts("# Title\n\nSome text.", 40);
        assert_eq!(lines, vec!["Title", "", "Some text."]);
    }

    #[test]
    fn test_unordered_list() {
        let lines = texts("- one\n- two", 40);
        assert_eq!(lines, vec!["• one", "• two"]);
    }

    #[test]
    fn test_ordered_list_respects_start() {
        let lines = texts("3. c\n4. d", 40);
        assert_eq!(lines, vec!["3. c", "4. d"]);
    }

    #[test]
    fn test_list_item_wraps_with_hanging_indent() {
        let lines = texts("- alpha beta gamma", 12);
        assert_eq!(lines, vec!["• alpha beta", "  gamma"]);
    }

    #[test]
    fn test_nested_list() {
        let lines = texts("- outer\n  - inner", 40);
        assert_eq!(lines, vec!["• outer", "  • inner"]);
    }

    #[test]
    fn test_fenced_code_block() {
        let lines = texts("```rust\nfn main() {}\n```", 40);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("rust"));
        assert!(lines[1].ends_with("fn main() {}"));
    }

    #[test]
    fn test_unclosed_fence_while_streaming() {
        let lines = texts("Here:\n\n```py\nprint(1)", 40);
        assert!(lines.iter().any(|l| l.ends_with("print(1)")));
    }

    #[test]
    fn test_blockquote() {
        let lines = texts("> quoted", 40);
        assert_eq!(lines, vec!["│ quoted"]);
    }

    #[test]
    fn test_empty_document() {
        assert!(texts("", 40).is_empty());
    }
}
