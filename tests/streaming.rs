use std::sync::Arc;
use std::time::Duration;

use ancora::core::transcript::DEFAULT_GREETING;
use ancora::core::types::{PromptMessage, Role};
use ancora::core::{
    AutoscrollPolicy, ScrollMetrics, StreamOutcome, StreamingController, TranscriptEvent,
    TranscriptObserver, TranscriptStore,
};
use ancora::providers::SimulatedModel;
use ancora::providers::mock::{MockModel, MockScript};
use parking_lot::Mutex;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<TranscriptEvent>>,
}

impl Recorder {
    fn take(&self) -> Vec<TranscriptEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl TranscriptObserver for Recorder {
    fn on_event(&self, event: &TranscriptEvent) {
        self.events.lock().push(event.clone());
    }
}

fn controller_with_recorder(model: MockModel) -> (StreamingController, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let transcript = TranscriptStore::new().shared();
    transcript.lock().subscribe(recorder.clone());
    (StreamingController::new(Arc::new(model), transcript), recorder)
}

#[tokio::test]
async fn test_observers_see_append_then_growing_replacements() {
    let model = MockModel::new().with_script(MockScript::text(["Hel", "lo", "!"]));
    let (controller, recorder) = controller_with_recorder(model);

    assert_eq!(controller.submit("Hi").await, StreamOutcome::Completed);

    let events = recorder.take();
    let Some(TranscriptEvent::Appended(user)) = events.first() else {
        panic!("expected user append, got {events:?}");
    };
    assert_eq!(user.role, Role::User);
    assert_eq!(user.text, "Hi");

    let Some(TranscriptEvent::Appended(placeholder)) = events.get(1) else {
        panic!("expected placeholder append, got {events:?}");
    };
    assert_eq!(placeholder.role, Role::Assistant);
    assert!(placeholder.text.is_empty());

    let replacements: Vec<&str> = events[2..]
        .iter()
        .filter_map(|e| match e {
            TranscriptEvent::TextReplaced { id, text } if *id == placeholder.id => {
                Some(text.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(replacements, vec!["Hel", "Hello", "Hello!"]);
}

#[tokio::test]
async fn test_second_turn_replays_whole_conversation() {
    let model = MockModel::new()
        .with_script(MockScript::text(["First answer"]))
        .with_script(MockScript::text(["Second answer"]));
    let (controller, _) = controller_with_recorder(model.clone());

    controller.submit("one").await;
    controller.submit("two").await;

    let requests = model.request_history();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1],
        vec![
            PromptMessage::assistant(DEFAULT_GREETING),
            PromptMessage::user("one"),
            PromptMessage::assistant("First answer"),
            PromptMessage::user("two"),
        ]
    );
}

#[tokio::test]
async fn test_cancel_then_submit_again() {
    let model = MockModel::new()
        .with_script(MockScript::text(["half"]).then_hang())
        .with_script(MockScript::text(["fresh"]));
    let (controller, _) = controller_with_recorder(model.clone());

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit("go").await }
    });
    while !controller.is_active() {
        tokio::task::yield_now().await;
    }
    assert!(controller.cancel());
    assert_eq!(first.await.unwrap(), StreamOutcome::Cancelled);

    assert_eq!(controller.submit("again").await, StreamOutcome::Completed);

    let transcript = controller.transcript().lock().snapshot();
    assert_eq!(transcript.last().map(|m| m.text.as_str()), Some("fresh"));

    // The cancelled reply is kept and replayed as far as it got.
    let replayed = &model.request_history()[1];
    assert!(replayed.contains(&PromptMessage::assistant("half")));
}

#[tokio::test]
async fn test_cancel_stops_commits_from_a_producer_that_keeps_yielding() {
    let model = MockModel::new()
        .with_script(MockScript::text(["start "]).then_repeat("more ", Duration::from_millis(1)));
    let (controller, recorder) = controller_with_recorder(model);

    let task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit("go").await }
    });

    let replaced = |events: &[TranscriptEvent]| {
        events
            .iter()
            .filter(|e| matches!(e, TranscriptEvent::TextReplaced { .. }))
            .count()
    };
    while replaced(&recorder.events.lock()) < 3 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert!(controller.cancel());
    let events_at_cancel = recorder.events.lock().len();
    let text_at_cancel = controller.transcript().lock().last().unwrap().text.clone();
    assert!(text_at_cancel.starts_with("start more "));

    // Give the producer time to yield several more deltas.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(task.await.unwrap(), StreamOutcome::Cancelled);

    assert_eq!(recorder.events.lock().len(), events_at_cancel);
    let last = controller.transcript().lock().last().cloned().unwrap();
    assert_eq!(last.text, text_at_cancel);
    assert_ne!(last.text, ancora::core::STREAM_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_autoscroll_follows_stream_until_user_scrolls_away() {
    struct Follow {
        policy: Mutex<AutoscrollPolicy>,
        jumps: Mutex<usize>,
    }

    impl TranscriptObserver for Follow {
        fn on_event(&self, _: &TranscriptEvent) {
            let policy = self.policy.lock();
            policy.on_transcript_change(|| *self.jumps.lock() += 1);
        }
    }

    let follow = Arc::new(Follow {
        policy: Mutex::new(AutoscrollPolicy::new()),
        jumps: Mutex::new(0),
    });
    let transcript = TranscriptStore::empty().shared();
    transcript.lock().subscribe(follow.clone());

    let model = MockModel::new()
        .with_script(MockScript::text(["a", "b"]))
        .with_script(MockScript::text(["c", "d"]))
        .with_script(MockScript::text(["e"]));
    let controller = StreamingController::new(Arc::new(model), transcript);

    controller.submit("first").await;
    assert_eq!(*follow.jumps.lock(), 4);

    // 1000 - 500 - 400 = 100px from the bottom: past the threshold.
    follow
        .policy
        .lock()
        .on_scroll(ScrollMetrics::new(1000, 500, 400));
    controller.submit("second").await;
    assert_eq!(*follow.jumps.lock(), 4);

    // Exactly at the threshold counts as the bottom.
    follow
        .policy
        .lock()
        .on_scroll(ScrollMetrics::new(1000, 560, 400));
    controller.submit("third").await;
    assert!(*follow.jumps.lock() > 4);
}

#[tokio::test]
async fn test_simulated_model_streams_through_controller() {
    let transcript = TranscriptStore::new().shared();
    let controller = StreamingController::new(
        Arc::new(SimulatedModel::new(Duration::ZERO)),
        transcript,
    );

    assert_eq!(controller.submit("ping").await, StreamOutcome::Completed);

    let last = controller.transcript().lock().last().cloned().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert!(last.text.contains("ping"));
}
