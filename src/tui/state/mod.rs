use std::time::{Duration, Instant};

use crate::core::{AutoscrollPolicy, StreamOutcome};
use crate::tui::widgets::ScrollState;

/// View state owned by the UI loop. The transcript itself lives in the
/// store; this only tracks what the screen needs between frames.
pub struct AppState {
    pub should_quit: bool,
    pub spinner_frame: usize,
    pub scroll: ScrollState,
    pub autoscroll: AutoscrollPolicy,
    /// Set from Enter until the submission task reports back.
    pub submitting: bool,
    pub last_outcome: Option<StreamOutcome>,
    started: Option<Instant>,
}

impl AppState {
    #[must_use]
    pub fn new(autoscroll: AutoscrollPolicy) -> Self {
        Self {
            should_quit: false,
            spinner_frame: 0,
            scroll: ScrollState::new(),
            autoscroll,
            submitting: false,
            last_outcome: None,
            started: None,
        }
    }

    pub const fn tick(&mut self) {
        if self.submitting {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.started.map(|s| s.elapsed())
    }

    /// A new exchange always follows the bottom, whatever the user did before.
    pub fn start_submission(&mut self) {
        self.submitting = true;
        self.started = Some(Instant::now());
        self.last_outcome = None;
        self.autoscroll.resume();
        self.scroll.request_bottom();
    }

    pub fn finish_submission(&mut self, outcome: StreamOutcome) {
        self.submitting = false;
        self.started = None;
        self.spinner_frame = 0;
        self.last_outcome = Some(outcome);
    }

    pub fn on_transcript_changed(&mut self) {
        let scroll = &mut self.scroll;
        self.autoscroll.on_transcript_change(|| scroll.request_bottom());
    }

    /// Manual scrolling; the policy re-evaluates from the new position.
    pub fn scroll_by(&mut self, delta: i16) {
        self.scroll.scroll_by(delta);
        self.autoscroll.on_scroll(self.scroll.metrics());
    }

    pub fn jump_to_bottom(&mut self) {
        self.autoscroll.resume();
        self.scroll.request_bottom();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AutoscrollPolicy::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laid_out(total: usize, viewport: usize) -> AppState {
        let mut state = AppState::new(AutoscrollPolicy::with_threshold(3));
        state.scroll.update(total, viewport);
        state
    }

    #[test]
    fn test_new_content_follows_while_tracking() {
        let mut state = laid_out(50, 10);
        assert_eq!(state.scroll.position(), 40);

        state.on_transcript_changed();
        state.scroll.update(60, 10);

        assert_eq!(state.scroll.position(), 50);
    }

    #[test]
    fn test_scrolling_away_pauses_following() {
        let mut state = laid_out(50, 10);

        state.scroll_by(-10);
        assert!(!state.autoscroll.is_tracking());

        state.on_transcript_changed();
        state.scroll.update(60, 10);
        assert_eq!(state.scroll.position(), 30);
    }

    #[test]
    fn test_small_scroll_stays_within_threshold() {
        let mut state = laid_out(50, 10);

        state.scroll_by(-3);
        assert!(state.autoscroll.is_tracking());
    }

    #[test]
    fn test_returning_to_bottom_resumes() {
        let mut state = laid_out(50, 10);
        state.scroll_by(-20);
        assert!(!state.autoscroll.is_tracking());

        state.scroll_by(20);
        assert!(state.autoscroll.is_tracking());
    }

    #[test]
    fn test_submission_resumes_and_tracks_elapsed() {
        let mut state = laid_out(50, 10);
        state.scroll_by(-20);

        state.start_submission();
        assert!(state.autoscroll.is_tracking());
        assert!(state.elapsed().is_some());

        state.tick();
        assert_eq!(state.spinner_frame, 1);

        state.finish_submission(StreamOutcome::Completed);
        assert!(!state.submitting);
        assert!(state.elapsed().is_none());
        assert_eq!(state.last_outcome, Some(StreamOutcome::Completed));
    }
}
