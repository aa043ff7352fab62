#![forbid(unsafe_code)]

//! Trailing-edge debouncer driven by host-supplied time.
//!
//! Each [`Debouncer::trigger`] replaces any pending deadline with
//! `now + delay`; [`Debouncer::poll`] fires once when that deadline has
//! passed. Only the last trigger of a burst ever fires.
//!
//! The debouncer owns no timer. The host arms a real timer for
//! [`Debouncer::deadline`] (cancelling the previous one) and calls `poll`
//! when it expires, which keeps the logic deterministic under test.

use std::time::Duration;

use web_time::Instant;

/// Trailing debounce state machine.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer with the given quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record an event at `now`, replacing any pending deadline.
    ///
    /// Returns the new deadline.
    pub fn trigger(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.deadline = Some(deadline);
        deadline
    }

    /// Fire if the pending deadline has passed.
    ///
    /// Returns `true` exactly once per burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Pending deadline, if a burst is in flight.
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
