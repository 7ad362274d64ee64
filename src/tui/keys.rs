//! Keyboard stand-in for the physical button.
//!
//! One key per button action, plus quit. The terminal must already be in
//! raw mode (see [`super::terminal::setup_terminal`]).

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::error::{Error, Result};
use crate::input::InputSource;
use crate::types::Action;

/// Upper bound on a single `poll` so a blocking read stays responsive.
const POLL_SLICE: Duration = Duration::from_millis(100);

/// What a key means to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Press(Action),
    Quit,
}

/// Map a crossterm key event to a button action.
///
/// Returns None for keys that don't map to anything.
pub fn map_key(key: KeyEvent) -> Option<KeyInput> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyInput::Quit);
    }

    match key.code {
        KeyCode::Char('s') | KeyCode::Char(' ') | KeyCode::Enter => {
            Some(KeyInput::Press(Action::Tap))
        }
        KeyCode::Char('d') => Some(KeyInput::Press(Action::DoubleTap)),
        KeyCode::Char('l') => Some(KeyInput::Press(Action::LongPress)),
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyInput::Quit),
        _ => None,
    }
}

/// Reads button actions from the terminal keyboard.
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for KeyboardInput {
    fn next_action(&mut self, timeout: Option<Duration>) -> Result<Option<Action>> {
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            let slice = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return Ok(None);
                    }
                    left.min(POLL_SLICE)
                }
                None => POLL_SLICE,
            };

            if !event::poll(slice)? {
                continue;
            }

            // Release/repeat events would double every press on some platforms.
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match map_key(key) {
                Some(KeyInput::Press(action)) => {
                    debug!(?action, "key press");
                    return Ok(Some(action));
                }
                Some(KeyInput::Quit) => return Err(Error::InputClosed),
                None => {}
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
