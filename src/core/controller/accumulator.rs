use crate::core::error::Result;
use crate::core::types::Fragment;

/// Running text of the assistant entry being streamed.
#[derive(Debug, Default)]
pub struct DeltaBuffer {
    text: String,
    fragments: usize,
}

impl DeltaBuffer {
    /// Appends one fragment. Structured payloads are flattened to compact JSON.
    pub fn push(&mut self, fragment: &Fragment) -> Result<&str> {
        match fragment {
            Fragment::Text(text) => self.text.push_str(text),
            Fragment::Structured(value) => {
                let rendered = serde_json::to_string(value)?;
                self.text.push_str(&rendered);
            }
        }
        self.fragments += 1;
        Ok(&self.text)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn fragments(&self) -> usize {
        self.fragments
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}
