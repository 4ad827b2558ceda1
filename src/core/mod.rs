pub mod autoscroll;
pub mod controller;
pub mod error;
pub mod llm;
pub mod transcript;
pub mod types;

pub use autoscroll::{AutoscrollPolicy, AutoscrollState, ScrollMetrics};
pub use controller::{Rejection, STREAM_ERROR_MESSAGE, StreamOutcome, StreamingController};
pub use error::{ChatError, Result};
pub use llm::ChatModel;
pub use transcript::{SharedTranscript, TranscriptEvent, TranscriptObserver, TranscriptStore};
