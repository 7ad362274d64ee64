//! Character-wheel text entry.
//!
//! A cursor walks a [`CharacterSet`] on its own, one symbol per idle period.
//! The button acts on whatever symbol is showing:
//!
//! - Tap: append it (or finish, if it is `End`)
//! - DoubleTap: backspace, when enabled for this entry
//! - LongPress: clear everything
//!
//! [`TextEntry`] is the pure state machine; [`collect_input`] drives it
//! against a display and an input source.

use std::time::Duration;

use tracing::debug;

use crate::display::{DisplayHandle, Frame};
use crate::error::Result;
use crate::input::InputSource;
use crate::types::{Action, CharacterSet, DIAL_NUMBER_LEN, Symbol};

// ============================================================================
// OPTIONS
// ============================================================================

/// Per-entry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOptions {
    pub charset: CharacterSet,
    pub prompt: String,
    /// Whether DoubleTap deletes the last character.
    pub backspace: bool,
    /// Entry finishes by itself once the buffer reaches this length.
    pub max_len: Option<usize>,
}

impl EntryOptions {
    /// Phone number for the Dial flow.
    pub fn dial() -> Self {
        Self::contact_number("Enter Number")
    }

    /// Contact name: letters, no backspace, no length limit.
    pub fn contact_name(prompt: &str) -> Self {
        Self {
            charset: CharacterSet::letters(),
            prompt: prompt.to_string(),
            backspace: false,
            max_len: None,
        }
    }

    /// Contact number: digits with backspace, finishes at 10 digits.
    pub fn contact_number(prompt: &str) -> Self {
        Self {
            charset: CharacterSet::digits(),
            prompt: prompt.to_string(),
            backspace: true,
            max_len: Some(DIAL_NUMBER_LEN),
        }
    }
}

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Outcome of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStep {
    Continue,
    Done(String),
}

/// In-progress entry.
#[derive(Debug, Clone)]
pub struct TextEntry<'a> {
    options: &'a EntryOptions,
    buffer: String,
    wheel_index: usize,
}

impl<'a> TextEntry<'a> {
    pub fn new(options: &'a EntryOptions) -> Self {
        Self {
            options,
            buffer: String::new(),
            wheel_index: 0,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn wheel_index(&self) -> usize {
        self.wheel_index
    }

    /// Symbol currently under the wheel.
    pub fn current(&self) -> Symbol {
        self.options.charset.symbol_at(self.wheel_index)
    }

    /// Apply one event. `None` is an idle period with no press.
    pub fn handle(&mut self, event: Option<Action>) -> EntryStep {
        match event {
            None => {
                self.wheel_index = (self.wheel_index + 1) % self.options.charset.len();
                EntryStep::Continue
            }
            Some(Action::Tap) => self.accept(),
            Some(Action::DoubleTap) => {
                if self.options.backspace {
                    self.buffer.pop();
                    self.wheel_index = 0;
                }
                EntryStep::Continue
            }
            Some(Action::LongPress) => {
                self.buffer.clear();
                self.wheel_index = 0;
                EntryStep::Continue
            }
        }
    }

    fn accept(&mut self) -> EntryStep {
        let ch = match self.current() {
            Symbol::End => return EntryStep::Done(std::mem::take(&mut self.buffer)),
            Symbol::Char(ch) => ch,
        };

        self.buffer.push(ch);
        self.wheel_index = 0;

        if self.is_full() {
            EntryStep::Done(std::mem::take(&mut self.buffer))
        } else {
            EntryStep::Continue
        }
    }

    fn is_full(&self) -> bool {
        self.options
            .max_len
            .is_some_and(|max| self.buffer.chars().count() >= max)
    }

    /// Row 0 the prompt, row 1 the buffer followed by the wheel symbol.
    ///
    /// When the bottom line is wider than the display the head scrolls off,
    /// so the wheel symbol stays visible.
    pub fn frame(&self, columns: u16) -> Frame {
        let line = format!("{}{}", self.buffer, self.current());
        let width = line.chars().count();
        let skip = width.saturating_sub(columns as usize);
        let visible: String = line.chars().skip(skip).collect();
        Frame::two_lines(self.options.prompt.as_str(), visible)
    }
}

// ============================================================================
// DRIVER
// ============================================================================

/// Run an entry to completion and return the text.
///
/// Each idle `wheel_step` without a press advances the wheel one symbol.
pub fn collect_input(
    display: &DisplayHandle,
    input: &mut dyn InputSource,
    options: &EntryOptions,
    columns: u16,
    wheel_step: Duration,
) -> Result<String> {
    let mut entry = TextEntry::new(options);
    loop {
        display.present(&entry.frame(columns))?;
        let event = input.next_action(Some(wheel_step))?;
        if let EntryStep::Done(text) = entry.handle(event) {
            debug!(prompt = %options.prompt, len = text.len(), "text entry finished");
            return Ok(text);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
