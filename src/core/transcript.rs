use parking_lot::Mutex;
use std::sync::Arc;

use super::types::{Message, MessageId, PromptMessage, Role};

pub const DEFAULT_GREETING: &str = "Hello! How can I help you today?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    Appended(Message),
    TextReplaced { id: MessageId, text: String },
}

impl TranscriptEvent {
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        match self {
            Self::Appended(message) => message.id,
            Self::TextReplaced { id, .. } => *id,
        }
    }
}

/// Receives every transcript mutation, synchronously and in order.
///
/// Observers run while the owner of the store holds it, so they must not call
/// back into a [`SharedTranscript`], and that includes
/// `StreamingController::cancel`. Reading controller state such as
/// `is_active` is fine. Forward anything else as a message.
pub trait TranscriptObserver: Send + Sync {
    fn on_event(&self, event: &TranscriptEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

pub type SharedTranscript = Arc<Mutex<TranscriptStore>>;

pub struct TranscriptStore {
    messages: Vec<Message>,
    next_id: u64,
    observers: Vec<(SubscriptionId, Arc<dyn TranscriptObserver>)>,
    next_subscription: usize,
}

impl TranscriptStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }

    #[must_use]
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut store = Self::empty();
        store.append(Role::Assistant, greeting);
        store
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    #[must_use]
    pub fn shared(self) -> SharedTranscript {
        Arc::new(Mutex::new(self))
    }

    /// Id the next `append` will assign.
    #[must_use]
    pub const fn next_id(&self) -> MessageId {
        MessageId::new(self.next_id)
    }

    pub fn append(&mut self, role: Role, text: impl Into<String>) -> MessageId {
        let id = MessageId::new(self.next_id);
        self.next_id += 1;

        let message = Message::new(id, role, text);
        self.messages.push(message.clone());
        self.notify(&TranscriptEvent::Appended(message));
        id
    }

    /// Overwrites the text of `id`. Unknown ids are ignored: a stream may still
    /// be unwinding after its entry was finalized elsewhere.
    pub fn replace_text(&mut self, id: MessageId, text: impl Into<String>) {
        let Some(message) = self.messages.iter_mut().rev().find(|m| m.id == id) else {
            tracing::debug!(%id, "replace_text on unknown message ignored");
            return;
        };

        message.text = text.into();
        let event = TranscriptEvent::TextReplaced {
            id,
            text: message.text.clone(),
        };
        self.notify(&event);
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.id == id)
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Prior turns as role-tagged messages, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<PromptMessage> {
        self.messages.iter().map(Message::to_prompt).collect()
    }

    pub fn subscribe(&mut self, observer: Arc<dyn TranscriptObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&self, event: &TranscriptEvent) {
        for (_, observer) in &self.observers {
            observer.on_event(event);
        }
    }
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TranscriptStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptStore")
            .field("messages", &self.messages)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<TranscriptEvent>>,
    }

    impl TranscriptObserver for Recorder {
        fn on_event(&self, event: &TranscriptEvent) {
            self.events.lock().push(event.clone());
        }
    }

    #[test]
    fn new_store_holds_greeting() {
        let store = TranscriptStore::new();

        assert_eq!(store.len(), 1);
        let greeting = &store.messages()[0];
        assert_eq!(greeting.role, Role::Assistant);
        assert_eq!(greeting.text, DEFAULT_GREETING);
    }

    #[test]
    fn append_assigns_increasing_ids() {
        let mut store = TranscriptStore::empty();
        let first = store.append(Role::User, "a");
        let second = store.append(Role::Assistant, "b");

        assert!(first < second);
        assert_eq!(store.get(second).map(|m| m.text.as_str()), Some("b"));
    }

    #[test]
    fn replace_text_overwrites_matching_entry() {
        let mut store = TranscriptStore::empty();
        let user = store.append(Role::User, "question");
        let reply = store.append(Role::Assistant, "");

        store.replace_text(reply, "Hel");
        store.replace_text(reply, "Hello!");

        assert_eq!(store.get(reply).map(|m| m.text.as_str()), Some("Hello!"));
        assert_eq!(store.get(user).map(|m| m.text.as_str()), Some("question"));
    }

    #[test]
    fn replace_text_unknown_id_is_silent() {
        let recorder = Arc::new(Recorder::default());
        let mut store = TranscriptStore::empty();
        store.append(Role::User, "x");
        store.subscribe(recorder.clone());

        store.replace_text(MessageId::new(999), "ghost");

        assert!(recorder.events.lock().is_empty());
        assert_eq!(store.snapshot()[0].text, "x");
    }

    #[test]
    fn observers_see_mutations_in_order() {
        let recorder = Arc::new(Recorder::default());
        let mut store = TranscriptStore::empty();
        store.subscribe(recorder.clone());

        let id = store.append(Role::Assistant, "");
        store.replace_text(id, "partial");

        let events = recorder.events.lock();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            TranscriptEvent::Appended(m) if m.id == id && m.text.is_empty()
        ));
        assert_eq!(
            events[1],
            TranscriptEvent::TextReplaced {
                id,
                text: "partial".to_string()
            }
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let recorder = Arc::new(Recorder::default());
        let mut store = TranscriptStore::empty();
        let sub = store.subscribe(recorder.clone());

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.append(Role::User, "quiet");

        assert!(recorder.events.lock().is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_later_mutations() {
        let mut store = TranscriptStore::new();
        let before = store.snapshot();
        store.append(Role::User, "later");

        assert_eq!(before.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn history_replays_every_entry_in_order() {
        let mut store = TranscriptStore::new();
        store.append(Role::User, "Hi");
        store.append(Role::Assistant, "Hello!");

        let history = store.history();
        assert_eq!(
            history,
            vec![
                PromptMessage::assistant(DEFAULT_GREETING),
                PromptMessage::user("Hi"),
                PromptMessage::assistant("Hello!"),
            ]
        );
    }
}
