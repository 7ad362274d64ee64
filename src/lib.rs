//! cpi-menu: single-button, two-line menu system for a small phone-like device.

pub mod config;
pub mod contacts;
pub mod display;
pub mod error;
pub mod flows;
pub mod input;
pub mod logging;
pub mod menu;
pub mod scheduler;
pub mod session;
pub mod tui;
pub mod types;
pub mod widgets;

pub use error::{Error, Result};
