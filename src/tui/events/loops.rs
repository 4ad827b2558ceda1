use super::{AppEvent, POLL_TIMEOUT, SCROLL_DELTA, TICK_INTERVAL};
use crate::core::error::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind, MouseEventKind};
use tokio::sync::mpsc::UnboundedSender;

/// Maps a terminal event onto the app's vocabulary. Key releases and mouse
/// moves are dropped.
#[must_use]
pub fn translate(event: CrosstermEvent) -> Option<AppEvent> {
    match event {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Some(AppEvent::Input(key)),
        CrosstermEvent::Paste(text) => Some(AppEvent::Paste(text)),
        CrosstermEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(AppEvent::MouseScroll(-SCROLL_DELTA)),
            MouseEventKind::ScrollDown => Some(AppEvent::MouseScroll(SCROLL_DELTA)),
            _ => None,
        },
        _ => None,
    }
}

pub async fn terminal_event_loop(tx: UnboundedSender<AppEvent>) -> Result<()> {
    loop {
        if tx.is_closed() {
            break;
        }
        let polled = tokio::task::block_in_place(|| -> std::io::Result<Option<CrosstermEvent>> {
            if event::poll(POLL_TIMEOUT)? {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        })?;

        if let Some(app_event) = polled.and_then(translate)
            && tx.send(app_event).is_err()
        {
            break;
        }
    }
    Ok(())
}

pub async fn tick_loop(tx: UnboundedSender<AppEvent>) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        if tx.send(AppEvent::Tick).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyEventState, KeyModifiers, MouseEvent,
    };

    fn mouse(kind: MouseEventKind) -> CrosstermEvent {
        CrosstermEvent::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_translate_scroll() {
        assert!(matches!(
            translate(mouse(MouseEventKind::ScrollUp)),
            Some(AppEvent::MouseScroll(d)) if d == -SCROLL_DELTA
        ));
        assert!(matches!(
            translate(mouse(MouseEventKind::ScrollDown)),
            Some(AppEvent::MouseScroll(d)) if d == SCROLL_DELTA
        ));
        assert!(translate(mouse(MouseEventKind::Moved)).is_none());
    }

    #[test]
    fn test_translate_ignores_key_release() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(translate(CrosstermEvent::Key(release)).is_none());
        assert!(matches!(
            translate(CrosstermEvent::Key(KeyEvent::from(KeyCode::Enter))),
            Some(AppEvent::Input(_))
        ));
    }
}
