//! Navigation state algebra: pure types, zero effects.
//!
//! These types define the whole top-level state space. The transition
//! functions (`update`) and the frame builders (`view`) both program against
//! them; the session owns the single shared instance behind a mutex.

use serde::Serialize;

use crate::types::{MenuItem, Settings};

// ============================================================================
// SCREENS
// ============================================================================

/// Which layer currently owns the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Screen {
    /// Idle: the pair window auto-advances, nothing is pending.
    #[default]
    MainScroll,
    /// A pair is opened; the highlight toggles between its slots.
    MainHighlight,
    /// A feature flow owns display and input.
    InFlow(MenuItem),
}

// ============================================================================
// NAVIGATION STATE
// ============================================================================

/// Shared top-level navigation state.
///
/// `highlight_index` only means something in `MainHighlight`.
/// `pair_offset` is kept in bounds by modulo arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NavigationState {
    pub screen: Screen,
    /// First item of the pair window. Steps by 2.
    pub pair_offset: usize,
    /// Highlighted slot within the pair window (0 or 1).
    pub highlight_index: usize,
    /// True while a flow owns the display. Auto-scroll does nothing then.
    pub paused: bool,
}

impl NavigationState {
    /// Initial state: `MainScroll` at the first pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Items shown in the pair window.
    pub fn visible<'a>(&self, items: &'a [MenuItem]) -> &'a [MenuItem] {
        let start = self.pair_offset.min(items.len());
        let end = start + pair_len(self.pair_offset, items.len());
        &items[start..end]
    }

    /// Item under the highlight, if the indices are in range.
    pub fn highlighted(&self, items: &[MenuItem]) -> Option<MenuItem> {
        if self.highlight_index >= pair_len(self.pair_offset, items.len()) {
            return None;
        }
        items.get(self.pair_offset + self.highlight_index).copied()
    }
}

/// Number of items in the pair window starting at `offset` (0, 1 or 2).
///
/// The tail is never padded, so an odd-length list ends in a single.
pub fn pair_len(offset: usize, item_count: usize) -> usize {
    item_count.saturating_sub(offset).min(2)
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure navigation transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Store this state and redraw the menu.
    Screen(NavigationState),
    /// Store this state (already `InFlow` and paused), then run the flow.
    Dispatch {
        item: MenuItem,
        state: NavigationState,
    },
}

/// What one auto-scroll tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Navigation is paused; nothing changed, nothing drawn.
    Paused,
    /// Pair window advanced.
    Scrolled,
    /// Highlight moved to the next slot.
    Toggled,
    /// Nothing to advance (e.g. empty menu).
    Idle,
}

impl TickOutcome {
    /// Whether the tick calls for a redraw.
    pub fn redraws(self) -> bool {
        matches!(self, TickOutcome::Scrolled | TickOutcome::Toggled)
    }
}

// ============================================================================
// STATE DUMP
// ============================================================================

/// Snapshot logged when an invariant breaks.
#[derive(Debug, Clone, Serialize)]
pub struct StateDump {
    pub reason: String,
    pub navigation: NavigationState,
    pub settings: Option<Settings>,
    pub menu_len: usize,
}

impl StateDump {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"dump_error\":\"{e}\"}}"))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_idle_main_scroll() {
        let state = NavigationState::new();
        assert_eq!(state.screen, Screen::MainScroll);
        assert_eq!(state.pair_offset, 0);
        assert_eq!(state.highlight_index, 0);
        assert!(!state.paused);
    }

    #[test]
    fn pair_len_handles_tail_and_overflow() {
        assert_eq!(pair_len(0, 6), 2);
        assert_eq!(pair_len(4, 6), 2);
        assert_eq!(pair_len(4, 5), 1);
        assert_eq!(pair_len(6, 6), 0);
        assert_eq!(pair_len(9, 6), 0);
    }

    #[test]
    fn visible_window_follows_offset() {
        let state = NavigationState {
            pair_offset: 2,
            ..Default::default()
        };
        assert_eq!(
            state.visible(&MenuItem::ALL),
            &[MenuItem::Emergency, MenuItem::HeartRate]
        );
    }

    #[test]
    fn visible_window_out_of_range_is_empty() {
        let state = NavigationState {
            pair_offset: 10,
            ..Default::default()
        };
        assert!(state.visible(&MenuItem::ALL).is_empty());
    }

    #[test]
    fn highlighted_resolves_slot() {
        let state = NavigationState {
            screen: Screen::MainHighlight,
            pair_offset: 4,
            highlight_index: 1,
            paused: false,
        };
        assert_eq!(state.highlighted(&MenuItem::ALL), Some(MenuItem::System));
    }

    #[test]
    fn highlighted_rejects_slot_past_single_tail() {
        let items = &MenuItem::ALL[..5];
        let state = NavigationState {
            screen: Screen::MainHighlight,
            pair_offset: 4,
            highlight_index: 1,
            paused: false,
        };
        assert_eq!(state.highlighted(items), None);
    }

    #[test]
    fn only_changes_redraw() {
        assert!(TickOutcome::Scrolled.redraws());
        assert!(TickOutcome::Toggled.redraws());
        assert!(!TickOutcome::Paused.redraws());
        assert!(!TickOutcome::Idle.redraws());
    }

    #[test]
    fn state_dump_serializes_navigation() {
        let dump = StateDump {
            reason: "test".to_string(),
            navigation: NavigationState {
                screen: Screen::InFlow(MenuItem::Dial),
                pair_offset: 0,
                highlight_index: 0,
                paused: true,
            },
            settings: None,
            menu_len: 6,
        };
        let json = dump.to_json();
        assert!(json.contains("\"paused\":true"));
        assert!(json.contains("Dial"));
    }
}
