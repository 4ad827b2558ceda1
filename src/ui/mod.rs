pub mod markdown;
pub mod theme;

pub use markdown::MarkdownWidget;
pub use theme::Theme;
