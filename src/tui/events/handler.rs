use super::AppEvent;
use crate::core::transcript::{TranscriptEvent, TranscriptObserver};
use tokio::sync::mpsc::UnboundedSender;

/// Forwards transcript changes to the UI loop. Runs under the transcript
/// lock, so it only enqueues.
pub struct TuiTranscriptObserver {
    sender: UnboundedSender<AppEvent>,
}

impl TuiTranscriptObserver {
    #[must_use]
    pub const fn new(sender: UnboundedSender<AppEvent>) -> Self {
        Self { sender }
    }
}

impl TranscriptObserver for TuiTranscriptObserver {
    fn on_event(&self, event: &TranscriptEvent) {
        let _ = self.sender.send(AppEvent::TranscriptChanged(event.message_id()));
    }
}
