//! Pure rendering: navigation state in, display frame out.

use crate::display::{Frame, Row};
use crate::types::MenuItem;

use super::state::{NavigationState, Screen};

/// Top-level pair window.
///
/// `MainScroll`: first item indented one cell on row 0, second item at
/// column 1 on row 1. `MainHighlight`: each item on its own row with a
/// `"> "` marker on the highlighted one. A flow owns the display in
/// `InFlow`, so nothing is drawn for it.
pub fn main_menu(state: &NavigationState, items: &[MenuItem]) -> Frame {
    let visible = state.visible(items);

    match state.screen {
        Screen::MainScroll => {
            let mut frame = Frame::new();
            if let Some(first) = visible.first() {
                frame = frame.line(Row::Top, 0, format!(" {first}"));
            }
            if let Some(second) = visible.get(1) {
                frame = frame.line(Row::Bottom, 1, second.label());
            }
            frame
        }
        Screen::MainHighlight => visible
            .iter()
            .enumerate()
            .filter_map(|(slot, item)| Row::from_index(slot).map(|row| (slot, row, item)))
            .fold(Frame::new(), |frame, (slot, row, item)| {
                let marker = if slot == state.highlight_index { ">" } else { " " };
                frame.line(row, 0, format!("{marker} {item}"))
            }),
        Screen::InFlow(_) => Frame::new(),
    }
}

/// Transient two-line message ("Dialing:" / number and the like).
pub fn message(top: &str, bottom: &str) -> Frame {
    Frame::two_lines(top, bottom)
}

/// Single-line notice on row 0.
pub fn notice(text: &str) -> Frame {
    Frame::new().line(Row::Top, 0, text)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scroll_at(offset: usize) -> NavigationState {
        NavigationState {
            pair_offset: offset,
            ..Default::default()
        }
    }

    #[test]
    fn scroll_frame_positions_pair() {
        let frame = main_menu(&scroll_at(0), &MenuItem::ALL);
        assert_eq!(
            frame.lines(),
            Frame::new()
                .line(Row::Top, 0, " Dial")
                .line(Row::Bottom, 1, "Contacts")
                .lines()
        );
    }

    #[test]
    fn scroll_frame_single_tail_leaves_row_one_blank() {
        let frame = main_menu(&scroll_at(4), &MenuItem::ALL[..5]);
        assert_eq!(frame.text_at(Row::Top), Some(" Settings"));
        assert_eq!(frame.text_at(Row::Bottom), None);
    }

    #[test]
    fn highlight_frame_marks_selected_slot() {
        let state = NavigationState {
            screen: Screen::MainHighlight,
            pair_offset: 2,
            highlight_index: 1,
            paused: false,
        };
        let frame = main_menu(&state, &MenuItem::ALL);
        assert_eq!(frame.text_at(Row::Top), Some("  Emergency"));
        assert_eq!(frame.text_at(Row::Bottom), Some("> Heart Rate"));
    }

    #[test]
    fn in_flow_draws_nothing() {
        let state = NavigationState {
            screen: Screen::InFlow(MenuItem::Dial),
            paused: true,
            ..Default::default()
        };
        assert!(main_menu(&state, &MenuItem::ALL).lines().is_empty());
    }

    #[test]
    fn notice_uses_top_row_only() {
        let frame = notice("No HR Sensor");
        assert_eq!(frame.text_at(Row::Top), Some("No HR Sensor"));
        assert_eq!(frame.text_at(Row::Bottom), None);
    }
}
