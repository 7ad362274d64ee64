//! Top-level menu: state, transitions, rendering.
//!
//! Architecture: Elm-like separation of concerns.
//! - `state`: pure data types (NavigationState, Screen, Transition)
//! - `update`: pure state transitions (state + action -> transition)
//! - `view`: pure frame builders (state -> display frame)
//!
//! The session and the auto-scroll thread are the only places that hold the
//! lock and touch the display.

pub mod state;
pub mod update;
pub mod view;

pub use state::{NavigationState, Screen, StateDump, TickOutcome, Transition};
