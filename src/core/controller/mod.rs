use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;

use super::error::ChatError;
use super::llm::ChatModel;
use super::transcript::SharedTranscript;
use super::types::{MessageId, PromptMessage, Role};

mod accumulator;
mod session;

pub use accumulator::DeltaBuffer;
pub use session::StreamSession;

/// Written over the assistant entry when a stream fails for any reason other
/// than cancellation.
pub const STREAM_ERROR_MESSAGE: &str =
    "Sorry, I encountered an error. Please check your API key and connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Busy,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("message is empty"),
            Self::Busy => f.write_str("a reply is still streaming"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    Rejected(Rejection),
    Completed,
    Cancelled,
    Failed(String),
}

enum Interruption {
    Cancelled,
    Failed(ChatError),
}

/// Drives one streamed reply at a time into the shared transcript.
#[derive(Clone)]
pub struct StreamingController {
    model: Arc<dyn ChatModel>,
    transcript: SharedTranscript,
    active: Arc<Mutex<Option<StreamSession>>>,
}

impl StreamingController {
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>, transcript: SharedTranscript) -> Self {
        Self {
            model,
            transcript,
            active: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub const fn transcript(&self) -> &SharedTranscript {
        &self.transcript
    }

    #[must_use]
    pub fn model(&self) -> &dyn ChatModel {
        self.model.as_ref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }

    #[must_use]
    pub fn active_target(&self) -> Option<MessageId> {
        self.active.lock().as_ref().map(StreamSession::target)
    }

    /// Appends the user turn plus an empty assistant entry and streams the
    /// model's reply into it. Blank input and submissions made while another
    /// session is live are ignored.
    pub async fn submit(&self, user_text: &str) -> StreamOutcome {
        let (session, history) = match self.begin(user_text) {
            Ok(started) => started,
            Err(rejection) => {
                tracing::debug!(?rejection, "submission ignored");
                return StreamOutcome::Rejected(rejection);
            }
        };

        let guard = ActiveGuard {
            slot: &self.active,
            session: &session,
        };

        tracing::debug!(
            session = %session.id(),
            target = %session.target(),
            history = history.len(),
            "stream session started"
        );

        let result = self.consume(&session, history).await;
        let outcome = self.finish(&session, result);
        drop(guard);
        outcome
    }

    /// Signals the live session and forgets it without waiting for the stream
    /// to unwind. Returns whether a session was live.
    pub fn cancel(&self) -> bool {
        let Some(session) = self.active.lock().take() else {
            return false;
        };

        // Cancelling under the transcript lock orders it against delta commits.
        let _transcript = self.transcript.lock();
        session.cancel();
        tracing::info!(session = %session.id(), "stream cancelled by user");
        true
    }

    fn begin(&self, user_text: &str) -> Result<(StreamSession, Vec<PromptMessage>), Rejection> {
        if user_text.trim().is_empty() {
            return Err(Rejection::Empty);
        }

        let mut active = self.active.lock();
        if active.is_some() {
            return Err(Rejection::Busy);
        }

        let mut transcript = self.transcript.lock();
        let mut history = transcript.history();
        history.push(PromptMessage::user(user_text));

        // The placeholder lands right after the user turn.
        let target = MessageId::new(transcript.next_id().get() + 1);
        let session = StreamSession::new(target);
        *active = Some(session.clone());

        // Observers run inside `append` and may read the session state.
        drop(active);

        transcript.append(Role::User, user_text);
        let placeholder = transcript.append(Role::Assistant, "");
        debug_assert_eq!(placeholder, target);
        drop(transcript);

        Ok((session, history))
    }

    async fn consume(
        &self,
        session: &StreamSession,
        history: Vec<PromptMessage>,
    ) -> Result<(), Interruption> {
        let token = session.token();

        let mut stream = tokio::select! {
            biased;
            () = token.cancelled() => return Err(Interruption::Cancelled),
            opened = self.model.stream(history, token.clone()) => {
                opened.map_err(|e| classify(session, e))?
            }
        };

        let mut buffer = DeltaBuffer::default();
        loop {
            let next = tokio::select! {
                biased;
                () = token.cancelled() => return Err(Interruption::Cancelled),
                next = stream.next() => next,
            };

            let Some(item) = next else {
                tracing::debug!(
                    session = %session.id(),
                    fragments = buffer.fragments(),
                    "stream exhausted"
                );
                return Ok(());
            };

            let fragment = item.map_err(|e| classify(session, e))?;
            let text = buffer.push(&fragment).map_err(Interruption::Failed)?;

            let mut transcript = self.transcript.lock();
            if session.is_cancelled() {
                return Err(Interruption::Cancelled);
            }
            transcript.replace_text(session.target(), text);
        }
    }

    fn finish(&self, session: &StreamSession, result: Result<(), Interruption>) -> StreamOutcome {
        match result {
            Ok(()) => {
                tracing::debug!(session = %session.id(), "stream completed");
                StreamOutcome::Completed
            }
            Err(Interruption::Cancelled) => {
                tracing::debug!(session = %session.id(), "stream stopped after cancellation");
                StreamOutcome::Cancelled
            }
            Err(Interruption::Failed(err)) => {
                let mut transcript = self.transcript.lock();
                if session.is_cancelled() {
                    return StreamOutcome::Cancelled;
                }
                tracing::error!(session = %session.id(), error = %err, "failed to stream reply");
                transcript.replace_text(session.target(), STREAM_ERROR_MESSAGE);
                StreamOutcome::Failed(err.to_string())
            }
        }
    }
}

impl std::fmt::Debug for StreamingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingController")
            .field("model", &self.model.model())
            .field("active", &self.active.lock().as_ref().map(StreamSession::id))
            .finish_non_exhaustive()
    }
}

/// Errors seen after the token fired are the producer reacting to it.
fn classify(session: &StreamSession, err: ChatError) -> Interruption {
    if session.is_cancelled() {
        Interruption::Cancelled
    } else {
        Interruption::Failed(err)
    }
}

/// Clears the active slot when a submission ends, including when the submit
/// future is dropped mid-stream. A newer session in the slot is left alone.
struct ActiveGuard<'a> {
    slot: &'a Mutex<Option<StreamSession>>,
    session: &'a StreamSession,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|live| live.same_as(self.session)) {
            *slot = None;
        }
    }
}
