//! The time model: a canvas' defined animation interval and the folding
//! applied to time coordinates when a list loops.
use serde::{Deserialize, Serialize};

/// Resolution of the time grid folded coordinates are snapped to.
pub const TICKS_PER_UNIT: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: f64,
    pub end: f64,
}

impl Default for TimeInterval {
    fn default() -> Self { Self { start: 0.0, end: 1.0 } }
}

impl TimeInterval {
    pub fn new(start: f64, end: f64) -> Self { Self { start, end } }

    pub fn length(&self) -> f64 { self.end - self.start }

    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start <= self.end
    }

    /// Wraps `t` into `[start, end)`. A zero-length interval folds everything onto `start`.
    ///
    /// The offset into the interval is snapped to a `1 / TICKS_PER_UNIT` grid,
    /// so `t` and `t + length()` always fold onto the same coordinate.
    pub fn fold(&self, t: f64) -> f64 {
        let len = self.length();
        if len <= 0.0 || !t.is_finite() {
            return self.start;
        }
        let ticks = ((t - self.start).rem_euclid(len) * TICKS_PER_UNIT).round();
        let offset = ticks / TICKS_PER_UNIT;
        if offset >= len {
            self.start
        } else {
            self.start + offset
        }
    }

    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.start, self.end.max(self.start))
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}
