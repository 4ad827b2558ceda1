use crate::core::StreamOutcome;
use crate::ui::theme::{Spinners, Theme};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use std::time::Duration;

const IDLE_HINTS: &str = "Enter send | PgUp/PgDn scroll | Ctrl+End follow | Ctrl+C quit";
const BUSY_HINTS: &str = "PgUp/PgDn scroll | Ctrl+End follow";

/// What the status bar shows for one frame.
pub struct StatusView<'a> {
    pub generating: bool,
    pub elapsed: Option<Duration>,
    pub spinner_frame: usize,
    pub following: bool,
    pub last_outcome: Option<&'a StreamOutcome>,
}

pub fn render_status(frame: &mut Frame, area: Rect, view: &StatusView<'_>) {
    let hints = if view.generating { BUSY_HINTS } else { IDLE_HINTS };
    let left_line = Line::from(vec![Span::raw(" "), Span::styled(hints, Theme::muted())]);
    frame
        .buffer_mut()
        .set_line(area.x, area.y, &left_line, area.width);

    let Some((text, style)) = right_status(view) else {
        return;
    };
    let right_line = Line::from(vec![Span::styled(text, style), Span::raw(" ")]);
    let status_len = (right_line.width() + 1) as u16;
    let status_x = area.x + area.width.saturating_sub(status_len);
    frame
        .buffer_mut()
        .set_line(status_x, area.y, &right_line, status_len);
}

fn right_status(view: &StatusView<'_>) -> Option<(String, Style)> {
    if view.generating {
        let frames = Spinners::BRAILLE;
        let frame_char = frames[view.spinner_frame % frames.len()];
        let paused = if view.following { "" } else { " | paused" };
        let elapsed = view.elapsed.map(format_elapsed).unwrap_or_default();
        return Some((
            format!("{frame_char} Generating… (Esc to stop){elapsed}{paused}"),
            Theme::warning(),
        ));
    }

    match view.last_outcome? {
        StreamOutcome::Completed => None,
        StreamOutcome::Cancelled => Some(("Stopped".to_string(), Theme::muted())),
        StreamOutcome::Failed(reason) => Some((format!("Error: {reason}"), Theme::error())),
        StreamOutcome::Rejected(rejection) => {
            Some((format!("Not sent: {rejection}"), Theme::muted()))
        }
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs > 0 {
        format!(" {secs}s")
    } else {
        format!(" {}ms", elapsed.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle(outcome: Option<&StreamOutcome>) -> StatusView<'_> {
        StatusView {
            generating: false,
            elapsed: None,
            spinner_frame: 0,
            following: true,
            last_outcome: outcome,
        }
    }

    #[test]
    fn test_generating_shows_spinner_and_elapsed() {
        let view = StatusView {
            generating: true,
            elapsed: Some(Duration::from_secs(2)),
            spinner_frame: 1,
            following: false,
            last_outcome: None,
        };
        let (text, _) = right_status(&view).expect("Expected status");
        assert_eq!(
            text,
            format!("{} Generating… (Esc to stop) 2s | paused", Spinners::BRAILLE[1])
        );
    }

    #[test]
    fn test_idle_outcomes() {
        assert!(right_status(&idle(None)).is_none());
        assert!(right_status(&idle(Some(&StreamOutcome::Completed))).is_none());

        let failed = StreamOutcome::Failed("boom".to_string());
        let (text, style) = right_status(&idle(Some(&failed))).expect("Expected status");
        assert_eq!(text, "Error: boom");
        assert_eq!(style, Theme::error());
    }

    #[test]
    fn test_sub_second_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(250)), " 250ms");
    }
}
