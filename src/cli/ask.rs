//! Headless single-turn mode.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::error::Result;
use crate::core::transcript::{TranscriptEvent, TranscriptObserver, TranscriptStore};
use crate::core::types::MessageId;
use crate::core::{StreamOutcome, StreamingController};
use crate::providers::create_provider;

#[derive(Debug, Default)]
struct EchoState {
    target: Option<MessageId>,
    printed: String,
}

/// Mirrors the streaming assistant entry onto a writer.
///
/// Only the newly grown suffix is written on each replacement. A replacement
/// that does not extend what was already written (the failure message) starts
/// on a fresh line.
pub struct StdoutEcho<W: Write + Send> {
    out: Mutex<W>,
    state: Mutex<EchoState>,
}

impl<W: Write + Send> StdoutEcho<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            state: Mutex::new(EchoState::default()),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl<W: Write + Send> TranscriptObserver for StdoutEcho<W> {
    fn on_event(&self, event: &TranscriptEvent) {
        let mut state = self.state.lock();
        match event {
            TranscriptEvent::Appended(message) if message.is_assistant() => {
                state.target = Some(message.id);
                state.printed.clear();
            }
            TranscriptEvent::TextReplaced { id, text } if state.target == Some(*id) => {
                if let Some(suffix) = text.strip_prefix(state.printed.as_str()) {
                    self.write(suffix);
                } else {
                    self.write("\n");
                    self.write(text);
                }
                state.printed.clone_from(text);
            }
            _ => {}
        }
    }
}

/// Sends `prompt` once and streams the reply to stdout. Ctrl+C stops the
/// stream and keeps what already arrived.
pub async fn run_ask(config: &AppConfig, prompt: &str) -> Result<StreamOutcome> {
    let model = create_provider(config)?;
    let transcript = TranscriptStore::with_greeting(config.greeting()).shared();
    transcript
        .lock()
        .subscribe(Arc::new(StdoutEcho::new(std::io::stdout())));

    let controller = StreamingController::new(model, transcript);
    let submission = controller.submit(prompt);
    tokio::pin!(submission);

    let outcome = tokio::select! {
        outcome = &mut submission => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::debug!("interrupt received, cancelling stream");
            controller.cancel();
            submission.await
        }
    };

    println!();
    Ok(outcome)
}
