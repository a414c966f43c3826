//! Pausable billing stopwatch
//!
//! Execution time is billed against the sender, but book-keeping the node does
//! on its own behalf (trace serialization, mostly) must not be. The timer is a
//! plain stopwatch with pause/resume: pausing records the elapsed time so far,
//! resuming shifts the start reference forward by the paused interval so that
//! later `elapsed()` readings exclude it.
//!
//! Single-threaded by design. One timer belongs to exactly one executing
//! transaction and is never shared across threads.

use std::time::{Duration, Instant};

/// Pausable stopwatch for fuel accounting.
///
/// `billed > 0` doubles as the paused flag: a zero accumulated duration means
/// the clock is running. `pause` and `resume` are both idempotent.
#[derive(Debug, Clone)]
pub struct BillingTimer {
    start: Instant,
    billed: Duration,
}

impl BillingTimer {
    /// Creates a running timer starting now.
    pub fn start() -> Self {
        BillingTimer {
            start: Instant::now(),
            billed: Duration::ZERO,
        }
    }

    /// Stops the clock, recording time elapsed so far. No-op when already
    /// paused.
    pub fn pause(&mut self) {
        if self.billed > Duration::ZERO {
            return; // already paused
        }
        self.billed = self.start.elapsed();
    }

    /// Restarts the clock, excluding the paused interval from future
    /// `elapsed()` readings. No-op when not paused.
    pub fn resume(&mut self) {
        if self.billed == Duration::ZERO {
            return; // not paused
        }
        self.start = Instant::now() - self.billed;
        self.billed = Duration::ZERO;
    }

    /// Wall-clock time billed so far.
    ///
    /// While paused this is frozen at the recorded value; while running it
    /// tracks the (possibly shifted) start reference.
    pub fn elapsed(&self) -> Duration {
        if self.billed > Duration::ZERO {
            self.billed
        } else {
            self.start.elapsed()
        }
    }

    /// True when the clock is stopped.
    pub fn is_paused(&self) -> bool {
        self.billed > Duration::ZERO
    }
}
