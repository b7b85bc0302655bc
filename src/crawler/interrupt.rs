//! Cooperative interruption of a running crawl
//!
//! The signal is a shared flag. A Ctrl-C handler sets it; the coordinator
//! checks it between state transitions, so an in-flight request or OCR call is
//! always allowed to finish (or time out) before the crawl stops. A second
//! Ctrl-C exits immediately without saving.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Exit status used when a second Ctrl-C forces the process down
pub const FORCED_EXIT_CODE: i32 = 130;

/// What to do about a received Ctrl-C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// First request: stop at the next safe point and save
    Stop,
    /// Repeated request while already stopping
    ForceExit,
}

/// Shared interruption flag
#[derive(Debug, Clone, Default)]
pub struct InterruptSignal {
    flag: Arc<AtomicBool>,
}

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the crawl to stop at the next safe point
    ///
    /// Returns true if this was the first request.
    pub fn trigger(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Records a Ctrl-C press and decides how to react to it
    pub fn on_ctrl_c(&self) -> InterruptAction {
        if self.trigger() {
            InterruptAction::Stop
        } else {
            InterruptAction::ForceExit
        }
    }

    /// Spawns a task that handles every Ctrl-C for the rest of the run
    ///
    /// Must be called from within a tokio runtime.
    pub fn listen_for_ctrl_c(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                match signal.on_ctrl_c() {
                    InterruptAction::Stop => tracing::warn!(
                        "Interrupt received, stopping after the current step (press Ctrl-C again to exit immediately)"
                    ),
                    InterruptAction::ForceExit => {
                        tracing::error!("Second interrupt received, exiting without saving");
                        std::process::exit(FORCED_EXIT_CODE);
                    }
                }
            }
        });
    }
}
