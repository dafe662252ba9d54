//! Fixed-rate tick scheduling for the main loop
//!
//! The poll timeout is whatever is left of the current period, so input does
//! not push the next tick back. At most one tick is reported per check: a
//! stalled loop catches up by one tick, never by several.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    rate: Duration,
    last_tick: Instant,
}

impl Ticker {
    pub fn new(rate: Duration, now: Instant) -> Self {
        Self { rate, last_tick: now }
    }

    /// How long the next poll may block
    pub fn timeout(&self, now: Instant) -> Duration {
        self.rate.saturating_sub(now.saturating_duration_since(self.last_tick))
    }

    /// True when a tick is due; the period restarts from `now`
    pub fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) >= self.rate {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}
