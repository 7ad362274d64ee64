//! Colors for the terminal LCD simulator.
//!
//! Pure data, consumed by `view`. The palette imitates a backlit
//! character display: light glyphs on a blue panel.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// PANEL
// ============================================================================

/// Character cells.
pub const STYLE_LCD: Style = Style::new()
    .fg(Color::White)
    .bg(Color::Blue)
    .add_modifier(Modifier::BOLD);

/// Bezel around the panel.
pub const STYLE_BEZEL: Style = Style::new().fg(Color::Gray);

/// Title on the bezel.
pub const STYLE_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

// ============================================================================
// CHROME
// ============================================================================

/// Key hints under the panel.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

/// Key names inside the hint line.
pub const STYLE_KEY: Style = Style::new().fg(Color::Cyan);

// ============================================================================
// TESTS
// ============================================================================
