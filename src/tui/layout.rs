use ratatui::layout::{Constraint, Direction, Layout, Rect};

const MIN_INPUT_ROWS: u16 = 3;
const MAX_INPUT_ROWS: u16 = 10;

pub struct LayoutAreas {
    pub header: Rect,
    pub chat: Rect,
    pub input: Rect,
    pub status: Rect,
}

/// The input box grows with its text (one separator row plus one row per
/// line) up to a cap; the chat takes whatever is left.
#[must_use]
pub fn calculate_layout(area: Rect, input_lines: usize) -> LayoutAreas {
    let input_rows = u16::try_from(input_lines)
        .unwrap_or(u16::MAX)
        .saturating_add(1)
        .clamp(MIN_INPUT_ROWS, MAX_INPUT_ROWS);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let middle_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(input_rows)])
        .split(main_chunks[1]);

    LayoutAreas {
        header: main_chunks[0],
        chat: middle_chunks[0],
        input: middle_chunks[1],
        status: main_chunks[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_calculation() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_layout(area, 1);

        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.input.height, 3);

        let expected_chat_height = 40 - 3 - 3 - 1;
        assert_eq!(layout.chat.height, expected_chat_height);
    }

    #[test]
    fn test_input_grows_with_lines() {
        let area = Rect::new(0, 0, 100, 40);

        assert_eq!(calculate_layout(area, 4).input.height, 5);
        assert_eq!(calculate_layout(area, 50).input.height, MAX_INPUT_ROWS);
    }

    #[test]
    fn test_layout_minimum_chat_height() {
        let area = Rect::new(0, 0, 80, 10);
        let layout = calculate_layout(area, 1);

        assert!(layout.chat.height > 0);
    }
}
