//! Time-driven offset that eases toward its target.

use crate::model::Timestamp;

/// Ease-out exponential curve.
///
/// `t` elapsed time, `b` start value, `c` total change, `d` duration.
pub fn ease_out_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t >= d {
        b + c
    } else {
        c * (-(2f64.powf(-10.0 * t / d)) + 1.0) + b
    }
}

/// A pixel offset that can jump or animate to a new target.
///
/// Sampled values are floored to whole pixels while the animation runs; the
/// final sample is the exact target.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedOffset {
    from: f64,
    to: f64,
    started: Timestamp,
    duration_ms: u64,
    value: f64,
    animating: bool,
}

impl AnimatedOffset {
    /// Offset resting at 0.
    pub fn new(duration_ms: u64) -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            started: Timestamp::default(),
            duration_ms,
            value: 0.0,
            animating: false,
        }
    }

    /// Move toward `target`, starting from the current sample.
    pub fn set(&mut self, target: f64, animate: bool, now: Timestamp) {
        if self.animating && animate && target == self.to {
            return;
        }
        if !animate || self.duration_ms == 0 || target == self.value {
            self.from = target;
            self.to = target;
            self.value = target;
            self.animating = false;
            return;
        }
        self.from = self.value;
        self.to = target;
        self.started = now;
        self.animating = true;
    }

    /// Sample the curve at `now`. Returns true if the value changed.
    pub fn advance(&mut self, now: Timestamp) -> bool {
        if !self.animating {
            return false;
        }
        let elapsed = now.millis_since(self.started);
        let next = if elapsed >= self.duration_ms {
            self.animating = false;
            self.to
        } else {
            ease_out_expo(
                elapsed as f64,
                self.from,
                self.to - self.from,
                self.duration_ms as f64,
            )
            .floor()
        };
        let changed = next != self.value;
        self.value = next;
        changed
    }

    /// Current sample.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Where the offset is heading.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// True until the last sample reached the target.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Change the animation length for future sets.
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }
}
