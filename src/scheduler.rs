//! Auto-scroll background thread.
//!
//! Once per scroll period the pair window advances (or, in highlight mode,
//! the highlight moves to the other slot) and the menu is redrawn. The
//! period is read from the shared settings at the start of every cycle, so
//! a speed change takes effect on the next wait.
//!
//! The wait doubles as the stop signal: `recv_timeout` on a channel that
//! [`AutoScroll::stop`] closes.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, trace, warn};

use crate::error::Result;
use crate::menu::{TickOutcome, update, view};
use crate::session::Shared;
use crate::types::MenuItem;

/// One scheduler step.
///
/// The paused check, the mutation and the redraw all happen under the
/// navigation lock. A paused tick touches neither state nor display.
pub fn tick(shared: &Shared) -> Result<TickOutcome> {
    shared.with_nav(|nav| {
        let outcome = update::tick(nav, MenuItem::ALL.len());
        if outcome.redraws() {
            shared.display().present(&view::main_menu(nav, &MenuItem::ALL))?;
        }
        Ok(outcome)
    })
}

/// How long the next cycle waits.
pub fn next_period(shared: &Shared) -> Result<Duration> {
    Ok(shared.settings()?.scroll_interval())
}

/// Handle to the running auto-scroll thread.
#[derive(Debug)]
pub struct AutoScroll {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AutoScroll {
    /// Spawn the thread. It runs until [`stop`](Self::stop) or drop.
    pub fn spawn(shared: Arc<Shared>) -> Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("auto-scroll".to_string())
            .spawn(move || run(&shared, &stop_rx))?;
        debug!("auto-scroll started");
        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the thread and wait for it. Idempotent.
    pub fn stop(&mut self) {
        // Dropping the sender wakes the wait with `Disconnected`.
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("auto-scroll thread panicked");
            } else {
                debug!("auto-scroll stopped");
            }
        }
    }
}

impl Drop for AutoScroll {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(shared: &Shared, stop_rx: &mpsc::Receiver<()>) {
    loop {
        let period = match next_period(shared) {
            Ok(period) => period,
            Err(e) => {
                shared.report_fault(e);
                return;
            }
        };

        match stop_rx.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        match tick(shared) {
            Ok(outcome) => trace!(?outcome, "tick"),
            Err(e) if e.is_invariant_violation() => {
                shared.report_fault(e);
                return;
            }
            Err(e) => warn!(error = %e, "auto-scroll redraw failed"),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
