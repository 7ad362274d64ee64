//! Terminal simulator for the device's display and button.
//!
//! Organized along FP/Unix boundaries:
//! - `theme`: pure style constants
//! - `view`: pure rendering (LCD contents -> ratatui widgets)
//! - `keys`: key mapping and the keyboard input source
//! - `terminal`: effects (raw mode, alternate screen, panic hook)

pub mod keys;
pub mod terminal;
pub mod theme;
pub mod view;

use tracing::info;

use crate::error::Result;
use crate::session::Session;
use crate::types::SessionConfig;

pub use keys::{KeyInput, KeyboardInput, map_key};
pub use terminal::{TerminalDisplay, install_panic_hook, restore_terminal};

/// Run an interactive session in the terminal until the user quits.
pub fn run(config: SessionConfig) -> Result<()> {
    install_panic_hook();
    let display = TerminalDisplay::open(config.display_columns)?;
    let mut session = Session::new(config, display, KeyboardInput::new());

    let result = session.start().and_then(|()| session.run());
    session.stop();
    drop(session);

    restore_terminal()?;
    info!("terminal restored");
    result
}
