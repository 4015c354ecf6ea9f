// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linear interpolation driven by a frame clock.

use std::time::Duration;

/// State of a single running animation.
///
/// Times are frame-clock timestamps, not wall-clock instants, so the
/// controller can be stepped deterministically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationController {
    start_time: Duration,
    duration: Duration,
    from: f64,
    to: f64,
}

impl AnimationController {
    /// Create a new animation from `from` to `to` starting at `start_time`.
    pub fn new(start_time: Duration, duration: Duration, from: f64, to: f64) -> Self {
        Self {
            start_time,
            duration,
            from,
            to,
        }
    }

    /// The value the animation ends on.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// The value the animation started from.
    pub fn start_value(&self) -> f64 {
        self.from
    }

    /// Get the progress of the animation at `now`, 1.0 once finished.
    pub fn progress(&self, now: Duration) -> f64 {
        let elapsed = now.saturating_sub(self.start_time);
        if elapsed >= self.duration || self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        }
    }

    /// Compute the value at `now`.
    ///
    /// Returns the interpolated value and whether the animation is done. Once
    /// done the value is exactly the target.
    pub fn advance(&self, now: Duration) -> (f64, bool) {
        let progress = self.progress(now);

        if progress < 1.0 {
            (self.from + (self.to - self.from) * progress, false)
        } else {
            (self.to, true)
        }
    }
}
