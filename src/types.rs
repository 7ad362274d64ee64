//! Domain types for cpi-menu.
//!
//! Everything here is plain data: the menu items, the button actions, the
//! character sets used by the wheel, the user settings and the startup
//! configuration. Behavior lives in the modules that consume these.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// MENU
// ============================================================================

/// Top-level menu entries, in display order.
///
/// Closed set: feature flows are dispatched on this enum, never on labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MenuItem {
    Dial,
    Contacts,
    Emergency,
    HeartRate,
    Settings,
    System,
}

impl MenuItem {
    /// The fixed, ordered top-level menu.
    pub const ALL: [MenuItem; 6] = [
        MenuItem::Dial,
        MenuItem::Contacts,
        MenuItem::Emergency,
        MenuItem::HeartRate,
        MenuItem::Settings,
        MenuItem::System,
    ];

    /// Text shown on the display.
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Dial => "Dial",
            MenuItem::Contacts => "Contacts",
            MenuItem::Emergency => "Emergency",
            MenuItem::HeartRate => "Heart Rate",
            MenuItem::Settings => "Settings",
            MenuItem::System => "System",
        }
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Emergency numbers offered by the Emergency flow.
pub const EMERGENCY_NUMBERS: [&str; 2] = ["911", "000"];

/// Synthetic last entry of the contact list.
pub const ADD_CONTACT_LABEL: &str = "Add Contact";

/// Numeric entry finalizes on its own at this many digits.
pub const DIAL_NUMBER_LEN: usize = 10;

// ============================================================================
// INPUT
// ============================================================================

/// Discrete actions produced by the single button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Short press. Accept / select everywhere.
    Tap,
    /// Two quick presses. Reset at top level, backspace in text entry,
    /// scroll in the list selector.
    DoubleTap,
    /// Held press. Clear in text entry.
    LongPress,
}

// ============================================================================
// CHARACTER SETS
// ============================================================================

/// One position on the character wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Char(char),
    /// Terminal sentinel: accepting it finishes the entry.
    End,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{c}"),
            Symbol::End => f.write_str("End"),
        }
    }
}

/// Ordered symbols for the wheel. Always non-empty, always ends in `End`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSet {
    symbols: Vec<Symbol>,
}

impl CharacterSet {
    /// Build a set from `chars`, appending the `End` sentinel.
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        let mut symbols: Vec<Symbol> = chars.into_iter().map(Symbol::Char).collect();
        symbols.push(Symbol::End);
        Self { symbols }
    }

    /// `0`..`9` then End.
    pub fn digits() -> Self {
        Self::new('0'..='9')
    }

    /// `A`..`Z` then End.
    pub fn letters() -> Self {
        Self::new('A'..='Z')
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Never true; the sentinel is always present.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol under a wheel position; wraps around.
    pub fn symbol_at(&self, index: usize) -> Symbol {
        self.symbols[index % self.symbols.len()]
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

/// Auto-scroll period choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollSpeed {
    /// 0.5 s
    Fast,
    /// 1.0 s
    #[default]
    Medium,
    /// 2.0 s
    Slow,
}

impl ScrollSpeed {
    pub const ALL: [ScrollSpeed; 3] = [ScrollSpeed::Fast, ScrollSpeed::Medium, ScrollSpeed::Slow];

    pub fn interval(self) -> Duration {
        match self {
            ScrollSpeed::Fast => Duration::from_millis(500),
            ScrollSpeed::Medium => Duration::from_millis(1000),
            ScrollSpeed::Slow => Duration::from_millis(2000),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScrollSpeed::Fast => "Fast",
            ScrollSpeed::Medium => "Medium",
            ScrollSpeed::Slow => "Slow",
        }
    }
}

/// Backlight level. Recorded and echoed back, drives nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brightness {
    #[default]
    High,
    Medium,
    Low,
}

impl Brightness {
    pub const ALL: [Brightness; 3] = [Brightness::High, Brightness::Medium, Brightness::Low];

    pub fn label(self) -> &'static str {
        match self {
            Brightness::High => "High",
            Brightness::Medium => "Medium",
            Brightness::Low => "Low",
        }
    }
}

/// Live user settings, shared with the auto-scroll thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Settings {
    pub scroll_speed: ScrollSpeed,
    pub brightness: Brightness,
}

impl Settings {
    /// Current auto-scroll period.
    pub fn scroll_interval(&self) -> Duration {
        self.scroll_speed.interval()
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// A seed contact from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub name: String,
    pub number: String,
}

impl ContactEntry {
    pub fn new(name: &str, number: &str) -> Self {
        Self {
            name: name.to_string(),
            number: number.to_string(),
        }
    }
}

/// Startup configuration for a session.
///
/// Read once at startup; nothing is ever written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial auto-scroll speed.
    pub scroll_speed: ScrollSpeed,
    /// Initial (cosmetic) backlight level.
    pub brightness: Brightness,
    /// Display width in characters.
    pub display_columns: u16,
    /// How long the wheel waits for input before advancing one symbol.
    pub wheel_step_ms: u64,
    /// How long "Dialing" screens stay up.
    pub dial_hold_ms: u64,
    /// How long transient notices stay up.
    pub notice_hold_ms: u64,
    /// Contacts present at startup, in display order.
    pub contacts: Vec<ContactEntry>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scroll_speed: ScrollSpeed::Medium,
            brightness: Brightness::High,
            display_columns: 16,
            wheel_step_ms: 300,
            dial_hold_ms: 3000,
            notice_hold_ms: 2000,
            contacts: vec![
                ContactEntry::new("Mom", "1234567890"),
                ContactEntry::new("Dad", "0987654321"),
                ContactEntry::new("Doctor", "5555555555"),
            ],
        }
    }
}

impl SessionConfig {
    pub fn wheel_step(&self) -> Duration {
        Duration::from_millis(self.wheel_step_ms)
    }

    pub fn dial_hold(&self) -> Duration {
        Duration::from_millis(self.dial_hold_ms)
    }

    pub fn notice_hold(&self) -> Duration {
        Duration::from_millis(self.notice_hold_ms)
    }

    /// Initial settings derived from this configuration.
    pub fn settings(&self) -> Settings {
        Settings {
            scroll_speed: self.scroll_speed,
            brightness: self.brightness,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
