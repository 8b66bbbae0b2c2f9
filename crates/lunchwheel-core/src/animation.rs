use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Easing curves for the wheel animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Material standard curve, cubic-bezier(0.4, 0.0, 0.2, 1.0).
    #[default]
    FastOutSlowIn,
    /// Decelerate-only curve, cubic-bezier(0.0, 0.0, 0.2, 1.0).
    LinearOutSlowIn,
}

impl Easing {
    /// Map linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::FastOutSlowIn => CubicBezier::new(0.4, 0.0, 0.2, 1.0).solve(t),
            Easing::LinearOutSlowIn => CubicBezier::new(0.0, 0.0, 0.2, 1.0).solve(t),
        }
    }
}

/// CSS-style cubic bezier easing with fixed endpoints (0,0) and (1,1).
#[derive(Debug, Clone, Copy)]
struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    const EPSILON: f64 = 1e-7;

    fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn component(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    fn derivative(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    /// Find the curve parameter whose x equals `x`.
    fn parameter_for(&self, x: f64) -> f64 {
        // Newton first, it converges in a handful of steps on these curves
        let mut t = x;
        for _ in 0..8 {
            let err = Self::component(t, self.x1, self.x2) - x;
            if err.abs() < Self::EPSILON {
                return t;
            }
            let slope = Self::derivative(t, self.x1, self.x2);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        // Bisection fallback
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        while hi - lo > Self::EPSILON {
            let value = Self::component(t, self.x1, self.x2);
            if (value - x).abs() < Self::EPSILON {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    fn solve(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let t = self.parameter_for(x).clamp(0.0, 1.0);
        Self::component(t, self.y1, self.y2).clamp(0.0, 1.0)
    }
}

/// Interpolates a rotation from one angle to another over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Move the clock forward and return the new value.
    pub fn advance(&mut self, dt: Duration) -> f64 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    /// Linear time progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn value(&self) -> f64 {
        if self.is_settled() {
            return self.to;
        }
        let eased = self.easing.apply(self.progress());
        let value = self.from + (self.to - self.from) * eased;
        if self.to >= self.from {
            value.clamp(self.from, self.to)
        } else {
            value.clamp(self.to, self.from)
        }
    }

    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Time left until the tween settles.
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    /// Restart toward a new target from wherever the tween is now.
    pub fn retarget(&mut self, to: f64, duration: Duration, easing: Easing) {
        self.from = self.value();
        self.to = to;
        self.duration = duration;
        self.elapsed = Duration::ZERO;
        self.easing = easing;
    }
}
