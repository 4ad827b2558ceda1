use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkdownError {
    #[error("Markdown could not be rendered: {0}")]
    Parse(String),
}
