//! Exponential backoff shared across the whole enrichment run.
//!
//! The generation service enforces a global rate limit, so the controller is
//! process-wide state: it survives from row to row and only returns to the
//! floor after a successful call.

use std::thread;
use std::time::Duration;

/// Explicit backoff state: floor, ceiling, and the wait used for the next
/// rate-limited retry.
#[derive(Debug, Clone)]
pub struct Backoff {
    floor: Duration,
    ceiling: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(floor: Duration, ceiling: Duration) -> Self {
        Self {
            floor,
            ceiling,
            current: floor,
        }
    }

    /// The wait the next rate-limited retry would incur.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Sleep for the current interval, then double it (capped at the
    /// ceiling) for the retry after that.
    pub fn wait(&mut self) {
        let interval = self.current;
        thread::sleep(interval);
        self.advance();
    }

    fn advance(&mut self) {
        self.current = self.current.saturating_mul(2).min(self.ceiling);
    }

    /// Return to the floor. Called after any successful generation, never on
    /// failure.
    pub fn reset(&mut self) {
        self.current = self.floor;
    }
}
