//! Pure navigation transitions: (NavigationState, Action) -> Transition.
//!
//! No locks, no display, no clock. The session and the auto-scroll thread
//! apply these under the navigation mutex; tests call them directly.

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Action, MenuItem};

use super::state::{NavigationState, Screen, TickOutcome, Transition, pair_len};

/// Top-level transition for one button action.
///
/// Actions arriving while a flow owns input are no-ops here; the flow reads
/// them itself.
pub fn update(state: NavigationState, action: Action, items: &[MenuItem]) -> Result<Transition> {
    match (state.screen, action) {
        (Screen::InFlow(_), _) => Ok(Transition::Screen(state)),
        (_, Action::Tap) => accept(state, items),
        (_, Action::DoubleTap) => Ok(Transition::Screen(reset())),
        (_, Action::LongPress) => Ok(Transition::Screen(state)),
    }
}

/// Two-phase select.
///
/// First accept freezes the pair and starts highlighting slot 0. Second
/// accept resolves the highlighted item and hands it to its flow.
pub fn accept(state: NavigationState, items: &[MenuItem]) -> Result<Transition> {
    match state.screen {
        Screen::MainScroll => Ok(Transition::Screen(NavigationState {
            screen: Screen::MainHighlight,
            highlight_index: 0,
            ..state
        })),
        Screen::MainHighlight => {
            let index = state.pair_offset + state.highlight_index;
            let item = state.highlighted(items).ok_or(Error::InvalidSelection {
                index,
                len: items.len(),
            })?;
            debug!(?item, index, "selection resolved");
            Ok(Transition::Dispatch {
                item,
                state: NavigationState {
                    screen: Screen::InFlow(item),
                    paused: true,
                    ..state
                },
            })
        }
        Screen::InFlow(_) => Ok(Transition::Screen(state)),
    }
}

/// Back to the first pair in `MainScroll`, unpaused.
pub fn reset() -> NavigationState {
    NavigationState::new()
}

/// State after a flow returns: unpaused, first pair, highlight cleared.
pub fn finish_flow() -> NavigationState {
    reset()
}

/// One auto-scroll step, in place.
pub fn tick(state: &mut NavigationState, item_count: usize) -> TickOutcome {
    if state.paused {
        return TickOutcome::Paused;
    }

    match state.screen {
        Screen::MainScroll if item_count > 0 => {
            state.pair_offset = (state.pair_offset + 2) % item_count;
            TickOutcome::Scrolled
        }
        Screen::MainHighlight => {
            // A one-item tail pair has nowhere to move the highlight.
            let slots = pair_len(state.pair_offset, item_count);
            if slots <= 1 {
                return TickOutcome::Idle;
            }
            state.highlight_index = (state.highlight_index + 1) % slots;
            TickOutcome::Toggled
        }
        _ => TickOutcome::Idle,
    }
}

// ============================================================================
// TESTS
// ============================================================================
