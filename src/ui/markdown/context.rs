use crate::ui::theme::Glyphs;

/// Where a block is being laid out: nesting depth and the columns left for it.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub indent_level: usize,
    pub quote_depth: usize,
    pub width: usize,
}

impl RenderContext {
    const INDENT_STR: &'static str = "  ";

    pub const fn new(width: usize) -> Self {
        Self {
            indent_level: 0,
            quote_depth: 0,
            width,
        }
    }

    /// Leading text for every line of a block in this context.
    pub fn prefix(&self) -> String {
        let mut prefix = Self::INDENT_STR.repeat(self.indent_level);
        for _ in 0..self.quote_depth {
            prefix.push_str(Glyphs::VERTICAL);
            prefix.push(' ');
        }
        prefix
    }

    pub const fn prefix_width(&self) -> usize {
        self.indent_level * Self::INDENT_STR.len() + self.quote_depth * 2
    }

    /// Never zero, so wrapping always makes progress.
    pub fn available_width(&self) -> usize {
        self.width.saturating_sub(self.prefix_width()).max(1)
    }

    pub const fn nested(&self) -> Self {
        Self {
            indent_level: self.indent_level + 1,
            ..*self
        }
    }

    pub const fn quoted(&self) -> Self {
        Self {
            quote_depth: self.quote_depth + 1,
            ..*self
        }
    }
}
