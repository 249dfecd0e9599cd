//! Cooldown timers gating repeated respawns and teleports.

use serde::{Serialize, Deserialize};

/// Countdown timer. Ready when the remaining time is zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    remaining: f32,
    duration: f32,
}

impl Cooldown {
    /// New timer, initially ready.
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: 0.0,
            duration,
        }
    }

    /// Count down by `dt` seconds, stopping at zero.
    #[inline]
    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    /// True once the timer has run out.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Restart the timer at its full duration.
    #[inline]
    pub fn trigger(&mut self) {
        self.remaining = self.duration;
    }

    /// Seconds left.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Full duration in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }
}
