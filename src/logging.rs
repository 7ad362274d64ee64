//! Tracing subscriber setup.
//!
//! One compact `fmt` layer filtered by `EnvFilter`. `RUST_LOG` wins over the
//! CLI level. The writer is stderr unless a log file is given; the
//! interactive simulator must use a file since stderr shares the terminal.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Result;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    /// Logging disabled.
    Off,
}

/// Build the filter from `RUST_LOG`, falling back to `level`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(level: &str, target: LogTarget<'_>) -> Result<()> {
    match target {
        LogTarget::Off => {}
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(build_filter(level))
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .compact()
                .try_init()
                .ok();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(build_filter(level))
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .compact()
                .try_init()
                .ok();
        }
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
