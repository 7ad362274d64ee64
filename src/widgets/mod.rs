//! Modal input widgets shared by the feature flows.
//!
//! Both own the display and the button until they return. Each is split into
//! a pure state machine (testable without any I/O) and a small driver loop.

pub mod selector;
pub mod wheel;

pub use selector::{SelectStep, Selector, confirm_action, select_from_options};
pub use wheel::{EntryOptions, EntryStep, TextEntry, collect_input};
