/// Distance from the bottom, in view units, still treated as "at the bottom".
pub const DEFAULT_THRESHOLD: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoscrollState {
    Tracking,
    Paused,
}

/// Scroll geometry reported by the view at a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub scroll_height: u32,
    pub scroll_top: u32,
    pub client_height: u32,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(scroll_height: u32, scroll_top: u32, client_height: u32) -> Self {
        Self {
            scroll_height,
            scroll_top,
            client_height,
        }
    }

    /// Negative when the view is scrolled past the end of the content.
    #[must_use]
    pub const fn distance_from_bottom(&self) -> i64 {
        self.scroll_height as i64 - self.scroll_top as i64 - self.client_height as i64
    }
}

/// Decides whether transcript updates should pull the view to the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoscrollPolicy {
    state: AutoscrollState,
    threshold: u32,
}

impl AutoscrollPolicy {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD)
    }

    #[must_use]
    pub const fn with_threshold(threshold: u32) -> Self {
        Self {
            state: AutoscrollState::Tracking,
            threshold,
        }
    }

    #[must_use]
    pub const fn state(&self) -> AutoscrollState {
        self.state
    }

    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        matches!(self.state, AutoscrollState::Tracking)
    }

    pub const fn on_scroll(&mut self, metrics: ScrollMetrics) -> AutoscrollState {
        self.state = if metrics.distance_from_bottom() <= self.threshold as i64 {
            AutoscrollState::Tracking
        } else {
            AutoscrollState::Paused
        };
        self.state
    }

    /// Runs `scroll_to_bottom` when tracking. Returns whether it ran.
    pub fn on_transcript_change<F>(&self, scroll_to_bottom: F) -> bool
    where
        F: FnOnce(),
    {
        if self.is_tracking() {
            scroll_to_bottom();
            true
        } else {
            false
        }
    }

    /// Re-anchors to the bottom, e.g. when the user sends a new message.
    pub const fn resume(&mut self) {
        self.state = AutoscrollState::Tracking;
    }
}

impl Default for AutoscrollPolicy {
    fn default() -> Self {
        Self::new()
    }
}
