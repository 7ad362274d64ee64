//! Input source abstraction for the single button.
//!
//! Debouncing and press classification happen upstream; this layer only sees
//! finished [`Action`]s. A timeout turns the blocking pull into a tick source
//! for the character wheel.

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::Action;

/// Pull-based producer of button actions.
pub trait InputSource: Send {
    /// Wait for the next action.
    ///
    /// `None` blocks indefinitely. With a timeout, `Ok(None)` means the
    /// period elapsed without input. `Err(Error::InputClosed)` ends the
    /// session.
    fn next_action(&mut self, timeout: Option<Duration>) -> Result<Option<Action>>;
}

// ============================================================================
// SCRIPTED INPUT
// ============================================================================

/// One scripted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Press(Action),
    /// A wheel period passing without input. Skipped by blocking reads.
    Idle,
    /// Real wall-clock wait, so the auto-scroll thread gets to run.
    Wait(Duration),
}

/// Input that replays a fixed list of steps, then reports closed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: VecDeque<Step>,
}

impl ScriptedInput {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Convenience for scripts made only of presses.
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(actions.into_iter().map(Step::Press))
    }

    /// Parse a whitespace- or comma-separated script. See [`parse_script`].
    pub fn parse(script: &str) -> Result<Self> {
        Ok(Self::new(parse_script(script)?))
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_action(&mut self, timeout: Option<Duration>) -> Result<Option<Action>> {
        loop {
            match self.steps.pop_front() {
                None => return Err(Error::InputClosed),
                Some(Step::Press(action)) => return Ok(Some(action)),
                Some(Step::Idle) => {
                    if timeout.is_some() {
                        return Ok(None);
                    }
                }
                Some(Step::Wait(duration)) => thread::sleep(duration),
            }
        }
    }
}

/// Parse replay tokens.
///
/// - `s` / `tap` -> Tap
/// - `d` / `double` -> DoubleTap
/// - `l` / `long` -> LongPress
/// - `.` -> one idle wheel period (`...` is three)
/// - `w<ms>` -> wait that many milliseconds
pub fn parse_script(script: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();

    for token in script
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        match token.to_ascii_lowercase().as_str() {
            "s" | "tap" => steps.push(Step::Press(Action::Tap)),
            "d" | "double" => steps.push(Step::Press(Action::DoubleTap)),
            "l" | "long" => steps.push(Step::Press(Action::LongPress)),
            dots if dots.chars().all(|c| c == '.') => {
                steps.extend(std::iter::repeat_n(Step::Idle, dots.len()));
            }
            wait if wait.starts_with('w') => {
                let ms: u64 = wait[1..]
                    .parse()
                    .map_err(|_| Error::Script(token.to_string()))?;
                steps.push(Step::Wait(Duration::from_millis(ms)));
            }
            _ => return Err(Error::Script(token.to_string())),
        }
    }

    Ok(steps)
}

// ============================================================================
// TESTS
// ============================================================================
