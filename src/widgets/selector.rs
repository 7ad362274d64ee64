//! Single-button list selector.
//!
//! DoubleTap moves to the next option (wrapping), Tap picks the one on
//! screen. There is no idle auto-advance and no cancel: a selection always
//! ends in a choice.

use tracing::debug;

use crate::display::{DisplayHandle, Frame};
use crate::error::Result;
use crate::input::InputSource;
use crate::types::Action;

/// Outcome of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectStep {
    Continue,
    Chosen(usize),
}

/// Cursor over a non-empty option list.
#[derive(Debug, Clone)]
pub struct Selector<'a, S: AsRef<str>> {
    prompt: &'a str,
    options: &'a [S],
    index: usize,
}

impl<'a, S: AsRef<str>> Selector<'a, S> {
    /// `None` when `options` is empty.
    pub fn new(prompt: &'a str, options: &'a [S]) -> Option<Self> {
        if options.is_empty() {
            return None;
        }
        Some(Self {
            prompt,
            options,
            index: 0,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn handle(&mut self, action: Action) -> SelectStep {
        match action {
            Action::DoubleTap => {
                self.index = (self.index + 1) % self.options.len();
                SelectStep::Continue
            }
            Action::Tap => SelectStep::Chosen(self.index),
            Action::LongPress => SelectStep::Continue,
        }
    }

    /// Row 0 the prompt, row 1 `"> option"`.
    pub fn frame(&self) -> Frame {
        Frame::two_lines(self.prompt, format!("> {}", self.options[self.index].as_ref()))
    }
}

/// Let the user pick one of `options`; returns its index.
///
/// An empty list has nothing to choose and resolves to index 0 without
/// touching the display, so callers must only offer non-empty lists.
pub fn select_from_options<S: AsRef<str>>(
    display: &DisplayHandle,
    input: &mut dyn InputSource,
    prompt: &str,
    options: &[S],
) -> Result<usize> {
    let Some(mut selector) = Selector::new(prompt, options) else {
        return Ok(0);
    };

    loop {
        display.present(&selector.frame())?;
        let Some(action) = input.next_action(None)? else {
            continue;
        };
        if let SelectStep::Chosen(index) = selector.handle(action) {
            debug!(prompt, choice = options[index].as_ref(), "option selected");
            return Ok(index);
        }
    }
}

/// Yes/No question. True only for "Yes".
pub fn confirm_action(
    display: &DisplayHandle,
    input: &mut dyn InputSource,
    prompt: &str,
) -> Result<bool> {
    const CHOICES: [&str; 2] = ["Yes", "No"];
    let index = select_from_options(display, input, prompt, &CHOICES)?;
    Ok(index == 0)
}

// ============================================================================
// TESTS
// ============================================================================
