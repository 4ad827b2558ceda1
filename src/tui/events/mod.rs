mod handler;
mod loops;

pub use handler::TuiTranscriptObserver;
pub use loops::{terminal_event_loop, tick_loop, translate};

use crate::core::StreamOutcome;
use crate::core::types::MessageId;
use crossterm::event::KeyEvent;
use std::time::Duration;

pub const POLL_TIMEOUT: Duration = Duration::from_millis(100);
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const SCROLL_DELTA: i16 = 3;

#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Paste(String),
    MouseScroll(i16),
    Resize(u16, u16),
    Tick,
    /// An entry was appended or its text replaced.
    TranscriptChanged(MessageId),
    StreamFinished(StreamOutcome),
}
