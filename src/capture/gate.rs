//! Trailing-edge coalescing rate gate.
//!
//! Limits a stream of values to one per interval. The first value in a window
//! passes immediately; later values within the window replace the pending one
//! and fire exactly once when the window elapses, so the newest state is
//! deferred but never dropped.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RateGate<T> {
    interval: Duration,
    last_fire: Option<Instant>,
    pending: Option<T>,
}

impl<T> RateGate<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
            pending: None,
        }
    }

    /// Offer a value; returns it back if it should fire right now, otherwise
    /// stores it as the pending trailing-edge fire, superseding any earlier
    /// pending value.
    pub fn offer(&mut self, value: T, now: Instant) -> Option<T> {
        match self.last_fire {
            Some(t) if now.duration_since(t) < self.interval => {
                self.pending = Some(value);
                None
            }
            _ => {
                self.last_fire = Some(now);
                Some(value)
            }
        }
    }

    /// Take the pending value once its window has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_none() {
            return None;
        }
        let due = match self.last_fire {
            Some(t) => now.duration_since(t) >= self.interval,
            None => true,
        };
        if due {
            self.last_fire = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
