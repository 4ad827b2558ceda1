#![allow(clippy::cast_possible_truncation)]
use crate::core::ScrollMetrics;

/// Viewport offset into the rendered chat lines. A jump to the bottom can be
/// requested before the line count is known; it is applied on the next
/// `update`.
#[derive(Debug, Clone)]
pub struct ScrollState {
    position: usize,
    total_lines: usize,
    viewport_height: usize,
    pending_bottom: bool,
}

impl ScrollState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: 0,
            total_lines: 0,
            viewport_height: 0,
            pending_bottom: true,
        }
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn is_at_bottom(&self) -> bool {
        self.position >= self.max_scroll()
    }

    /// Line-based geometry in the shape the autoscroll policy measures.
    #[must_use]
    pub const fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            self.total_lines as u32,
            self.position as u32,
            self.viewport_height as u32,
        )
    }

    pub fn update(&mut self, total_lines: usize, viewport_height: usize) {
        self.total_lines = total_lines;
        self.viewport_height = viewport_height;
        if self.pending_bottom {
            self.pending_bottom = false;
            self.position = self.max_scroll();
        } else {
            self.position = self.position.min(self.max_scroll());
        }
    }

    pub const fn request_bottom(&mut self) {
        self.pending_bottom = true;
    }

    pub const fn scroll_up(&mut self, lines: usize) {
        self.pending_bottom = false;
        self.position = self.position.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.pending_bottom = false;
        self.position = (self.position + lines).min(self.max_scroll());
    }

    /// Signed convenience for mouse wheel deltas.
    pub fn scroll_by(&mut self, delta: i16) {
        let lines = usize::from(delta.unsigned_abs());
        if delta < 0 {
            self.scroll_up(lines);
        } else {
            self.scroll_down(lines);
        }
    }

    const fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport_height)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_lands_on_bottom() {
        let mut state = ScrollState::new();
        state.update(30, 10);
        assert_eq!(state.position(), 20);
        assert!(state.is_at_bottom());
    }

    #[test]
    fn is_at_bottom_when_content_fits() {
        let mut state = ScrollState::new();
        state.update(5, 10);
        assert!(state.is_at_bottom());
        assert_eq!(state.metrics().distance_from_bottom(), -5);
    }

    #[test]
    fn scroll_up_down() {
        let mut state = ScrollState::new();
        state.update(20, 10);

        state.scroll_up(5);
        assert_eq!(state.position(), 5);

        state.scroll_down(2);
        assert_eq!(state.position(), 7);
        assert_eq!(state.metrics().distance_from_bottom(), 3);
    }

    #[test]
    fn clamps_to_bounds() {
        let mut state = ScrollState::new();
        state.update(20, 10);

        state.scroll_down(100);
        assert_eq!(state.position(), 10);

        state.scroll_by(-100);
        assert_eq!(state.position(), 0);
    }

    #[test]
    fn growth_keeps_position_without_request() {
        let mut state = ScrollState::new();
        state.update(20, 10);
        state.scroll_up(4);

        state.update(40, 10);
        assert_eq!(state.position(), 6);
        assert!(!state.is_at_bottom());

        state.request_bottom();
        state.update(41, 10);
        assert_eq!(state.position(), 31);
    }
}
