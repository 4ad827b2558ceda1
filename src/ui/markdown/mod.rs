mod block;
mod context;
mod error;
mod inline;
mod widget;

pub use block::wrap_spans;
pub use context::RenderContext;
pub use error::MarkdownError;
pub use widget::MarkdownWidget;
