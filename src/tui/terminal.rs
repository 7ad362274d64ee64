//! Terminal lifecycle and the on-screen LCD.
//!
//! [`TerminalDisplay`] buffers writes in an [`LcdBuffer`] and draws the whole
//! panel on `flush`, so a frame never shows half-written.

use std::io::{self, Stdout};

use crossterm::ExecutableCommand;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::display::{DisplaySink, LcdBuffer, Row};
use crate::error::Result;

use super::view::render;

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// DISPLAY
// ============================================================================

/// Two-row character display drawn in the terminal.
pub struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    lcd: LcdBuffer,
}

impl TerminalDisplay {
    /// Enter raw mode and the alternate screen.
    ///
    /// Pair with [`restore_terminal`] once the session is over.
    pub fn open(columns: u16) -> Result<Self> {
        Ok(Self {
            terminal: setup_terminal()?,
            lcd: LcdBuffer::new(columns),
        })
    }
}

impl DisplaySink for TerminalDisplay {
    fn clear(&mut self) -> Result<()> {
        self.lcd.clear();
        Ok(())
    }

    fn write_line(&mut self, row: Row, col: u16, text: &str) -> Result<()> {
        self.lcd.write(row, col, text);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let lcd = &self.lcd;
        self.terminal.draw(|frame| render(lcd, frame))?;
        Ok(())
    }
}
