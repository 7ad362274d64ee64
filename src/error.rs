//! Error types for cpi-menu.
//!
//! Two families live here:
//! - Expected user-input conditions (`DuplicateKey`, `NotFound`) which the
//!   feature flows recover from locally.
//! - Invariant violations (`InvalidSelection`, `LockPoisoned`) which point at
//!   a synchronization bug and abort the session with a state dump.

use thiserror::Error;

/// Result type alias for cpi-menu operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for cpi-menu operations.
#[derive(Error, Debug)]
pub enum Error {
    /// `add` was called with a name that is already in the directory.
    #[error("contact already exists: {0}")]
    DuplicateKey(String),

    /// `edit`/`remove` was called with a name that is not in the directory.
    #[error("contact not found: {0}")]
    NotFound(String),

    /// A resolved index fell outside its list. Unreachable under modulo
    /// arithmetic unless shared state was torn.
    #[error("selection index {index} out of range for {len} items")]
    InvalidSelection { index: usize, len: usize },

    /// The input source has no more actions (user quit or script exhausted).
    #[error("input source closed")]
    InputClosed,

    /// A shared-state mutex was poisoned by a panicking holder.
    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),

    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A replay script contained an unknown token.
    #[error("invalid script token: {0}")]
    Script(String),

    /// Configuration is structurally valid JSON but semantically wrong.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl Error {
    /// True for errors that indicate a bug rather than a user-input condition.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::InvalidSelection { .. } | Error::LockPoisoned(_))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_errors_are_recoverable() {
        assert!(!Error::DuplicateKey("Mom".into()).is_invariant_violation());
        assert!(!Error::NotFound("Eve".into()).is_invariant_violation());
        assert!(!Error::InputClosed.is_invariant_violation());
    }

    #[test]
    fn selection_and_lock_errors_are_fatal() {
        assert!(Error::InvalidSelection { index: 7, len: 6 }.is_invariant_violation());
        assert!(Error::LockPoisoned("navigation").is_invariant_violation());
    }

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            Error::DuplicateKey("Mom".into()).to_string(),
            "contact already exists: Mom"
        );
        assert_eq!(
            Error::InvalidSelection { index: 7, len: 6 }.to_string(),
            "selection index 7 out of range for 6 items"
        );
    }
}
