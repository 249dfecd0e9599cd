//! Frame delta measurement.

use std::time::Instant;

/// Measures elapsed time between frames.
///
/// The first frame reports zero. A single delta never exceeds `max_delta`,
/// so a host that stalls (debugger, window drag) resumes with one bounded
/// step instead of teleporting enemies through walls.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: f32,
}

impl FrameClock {
    /// New clock capping deltas at `max_delta` seconds.
    pub fn new(max_delta: f32) -> Self {
        Self {
            last: None,
            max_delta,
        }
    }

    /// Seconds since the previous call.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Seconds between the previous call and `now`.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let delta = match self.last {
            Some(previous) => now.saturating_duration_since(previous).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        delta.min(self.max_delta)
    }
}
